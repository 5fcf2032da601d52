//! Self-dismissing toast notices
//!
//! The contact section confirms a submission with a toast that hides itself
//! after a few seconds. Showing a new notice replaces the current one and
//! restarts the hide timer.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::constants::NOTICE_DISPLAY_MS;
use crate::error::{InteractionError, Result};
use crate::time::{SharedClock, TimerDriven, TimerSlot, TimerToken};

/// Visual tone of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeTone {
    /// Confirmation after a successful action.
    Success,
    /// Failure message.
    Error,
}

/// A message shown in the toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Text shown to the visitor.
    pub message: String,
    /// Success or error styling.
    pub tone: NoticeTone,
}

impl Notice {
    /// Builds a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: NoticeTone::Success,
        }
    }

    /// Builds an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: NoticeTone::Error,
        }
    }
}

/// Toast that hides itself `display_for` after each `show`.
#[derive(Debug)]
pub struct TimedNotice {
    current: Option<Notice>,
    hide_timer: TimerSlot,
    display_for: Duration,
    clock: SharedClock,
    disposed: bool,
    notifier: watch::Sender<Option<Notice>>,
}

impl TimedNotice {
    /// Fails with `InvalidConfiguration` when `display_for` is zero.
    pub fn new(clock: SharedClock, display_for: Duration) -> Result<Self> {
        if display_for.is_zero() {
            return Err(InteractionError::InvalidConfiguration(
                "notice display time must be greater than zero".to_string(),
            ));
        }
        Ok(Self::build(clock, display_for))
    }

    /// Toast with the default 5 s lifetime.
    pub fn with_default_duration(clock: SharedClock) -> Self {
        Self::build(clock, Duration::from_millis(NOTICE_DISPLAY_MS))
    }

    fn build(clock: SharedClock, display_for: Duration) -> Self {
        Self {
            current: None,
            hide_timer: TimerSlot::new(),
            display_for,
            clock,
            disposed: false,
            notifier: watch::channel(None).0,
        }
    }

    /// Replaces the current notice and restarts the hide timer.
    pub fn show(&mut self, notice: Notice) -> Result<()> {
        if self.disposed {
            return Err(InteractionError::UseAfterDispose("show"));
        }
        debug!(tone = ?notice.tone, "showing notice");
        self.hide_timer.arm_once(self.clock.now(), self.display_for);
        self.current = Some(notice);
        self.publish();
        Ok(())
    }

    /// Hides the notice now and cancels the hide timer.
    pub fn dismiss(&mut self) -> Result<()> {
        if self.disposed {
            return Err(InteractionError::UseAfterDispose("dismiss"));
        }
        self.hide_timer.cancel();
        self.hide();
        Ok(())
    }

    /// Delivers a fired timer. Stale tokens return `false`.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.disposed || !self.hide_timer.fire(token) {
            return false;
        }
        self.hide();
        true
    }

    /// Cancels the hide timer. A visible notice stays as it is.
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Err(InteractionError::UseAfterDispose("dispose"));
        }
        self.hide_timer.cancel();
        self.disposed = true;
        Ok(())
    }

    /// Borrowed view of the visible notice.
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Owned copy of the visible notice, if any.
    pub fn snapshot(&self) -> Option<Notice> {
        self.current.clone()
    }

    /// True while a notice is shown.
    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Token of the armed hide timer.
    pub fn pending_hide(&self) -> Option<TimerToken> {
        self.hide_timer.token()
    }

    /// True once `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Receives the visible notice after every change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notice>> {
        self.notifier.subscribe()
    }

    fn hide(&mut self) {
        if self.current.take().is_some() {
            trace!("notice hidden");
            self.publish();
        }
    }

    fn publish(&self) {
        self.notifier.send_replace(self.current.clone());
    }
}

impl TimerDriven for TimedNotice {
    fn next_deadline(&self) -> Option<Instant> {
        if self.disposed {
            return None;
        }
        self.hide_timer.deadline()
    }

    fn poll_timers(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        match self.hide_timer.take_due(self.clock.now()) {
            Some(_) => {
                self.hide();
                1
            }
            None => 0,
        }
    }
}

impl Drop for TimedNotice {
    fn drop(&mut self) {
        self.hide_timer.cancel();
    }
}
