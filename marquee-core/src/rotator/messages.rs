use serde::Deserialize;
use std::time::Duration;

use crate::time::TimerToken;

/// Everything a carousel view can tell a [`super::TimedRotator`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RotatorMessage {
    /// Section mounted or autoplay re-enabled
    Start {
        /// Autoplay period, in milliseconds on the wire.
        #[serde(with = "millis")]
        interval: Duration,
    },
    /// Autoplay switched off
    Stop,
    /// Right chevron
    Next,
    /// Left chevron
    Previous,
    /// Dot indicator
    GoTo {
        /// Requested slide. Negative values are rejected.
        index: i64,
    },
    /// A scheduled tick came due
    #[serde(skip)]
    TimerFired(TimerToken),
    /// Carousel unmounted
    Dispose,
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
