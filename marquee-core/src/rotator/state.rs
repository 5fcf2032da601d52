use std::fmt::Display;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::error::{InteractionError, Result};
use crate::time::{SharedClock, TimerDriven, TimerSlot, TimerToken};

/// What a carousel view paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotatorSnapshot {
    /// Active item.
    pub index: usize,
    /// Number of items.
    pub len: usize,
    /// Autoplay on.
    pub running: bool,
}

/// Cycles an index through `len` items on a fixed interval.
///
/// Used by the hero carousel and the testimonial carousel. Manual navigation
/// restarts the interval, so a slide the visitor just picked always gets a
/// full interval on screen.
#[derive(Debug)]
pub struct TimedRotator {
    index: usize,
    len: usize,
    /// Auto-advance period while running
    interval: Option<Duration>,
    tick: TimerSlot,
    clock: SharedClock,
    disposed: bool,
    notifier: watch::Sender<RotatorSnapshot>,
}

impl TimedRotator {
    /// Create a stopped rotator over `len` items showing index 0.
    pub fn new(len: usize, clock: SharedClock) -> Result<Self> {
        if len == 0 {
            return Err(InteractionError::InvalidConfiguration(
                "rotator needs at least one item".to_string(),
            ));
        }

        let (notifier, _) = watch::channel(RotatorSnapshot {
            index: 0,
            len,
            running: false,
        });
        Ok(Self {
            index: 0,
            len,
            interval: None,
            tick: TimerSlot::new(),
            clock,
            disposed: false,
            notifier,
        })
    }

    /// Begin auto-advancing every `interval`.
    ///
    /// Starting a running rotator replaces its timer; there is never more than
    /// one.
    pub fn start(&mut self, interval: Duration) -> Result<()> {
        self.ensure_live("start")?;
        if interval.is_zero() {
            return Err(InteractionError::InvalidConfiguration(
                "rotator interval must be greater than zero".to_string(),
            ));
        }

        self.interval = Some(interval);
        self.tick.arm_every(self.clock.now(), interval);
        debug!(?interval, items = self.len, "rotator started");
        self.publish();
        Ok(())
    }

    /// Stop auto-advancing. No-op when already stopped.
    pub fn stop(&mut self) -> Result<()> {
        self.ensure_live("stop")?;
        if self.interval.take().is_some() {
            self.tick.cancel();
            debug!(index = self.index, "rotator stopped");
            self.publish();
        }
        Ok(())
    }

    /// Show the next item, wrapping to 0 after the last one.
    pub fn next(&mut self) -> Result<()> {
        self.ensure_live("next")?;
        self.index = (self.index + 1) % self.len;
        self.after_manual_move();
        Ok(())
    }

    /// Show the previous item, wrapping to the last one from 0.
    pub fn previous(&mut self) -> Result<()> {
        self.ensure_live("previous")?;
        self.index = (self.index + self.len - 1) % self.len;
        self.after_manual_move();
        Ok(())
    }

    /// Jump straight to `target`.
    ///
    /// Accepts any integer type so a negative target coming from the view is
    /// reported as [`InteractionError::OutOfRange`] instead of wrapping.
    pub fn go_to<T>(&mut self, target: T) -> Result<()>
    where
        T: TryInto<usize> + Copy + Display,
    {
        self.ensure_live("go_to")?;
        let index = TryInto::<usize>::try_into(target)
            .ok()
            .filter(|index| *index < self.len)
            .ok_or_else(|| InteractionError::OutOfRange {
                target: target.to_string(),
                len: self.len,
            })?;

        self.index = index;
        self.after_manual_move();
        Ok(())
    }

    /// Deliver an auto-advance tick by token. Stale tokens and disposed
    /// rotators are ignored.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.disposed {
            trace!("timer {token} delivered after dispose, ignored");
            return false;
        }
        if !self.tick.fire(token) {
            return false;
        }
        self.advance();
        true
    }

    /// Tear down: cancel the tick. Every later call fails with
    /// [`InteractionError::UseAfterDispose`].
    pub fn dispose(&mut self) -> Result<()> {
        self.ensure_live("dispose")?;
        self.tick.cancel();
        self.interval = None;
        self.disposed = true;
        debug!("rotator disposed");
        Ok(())
    }

    /// Active item.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a rotator holds at least one item.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True while autoplay is on.
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Autoplay period, when running.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Token of the outstanding tick
    pub fn pending_tick(&self) -> Option<TimerToken> {
        self.tick.token()
    }

    /// True once `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current index and autoplay state.
    pub fn snapshot(&self) -> RotatorSnapshot {
        RotatorSnapshot {
            index: self.index,
            len: self.len,
            running: self.is_running(),
        }
    }

    /// Receive a snapshot after every index or autoplay change.
    pub fn subscribe(&self) -> watch::Receiver<RotatorSnapshot> {
        self.notifier.subscribe()
    }

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.disposed {
            return Err(InteractionError::UseAfterDispose(operation));
        }
        Ok(())
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.len;
        trace!(index = self.index, "rotator advanced");
        self.publish();
    }

    fn after_manual_move(&mut self) {
        if let Some(interval) = self.interval {
            // The next automatic tick is a full interval away again.
            self.tick.arm_every(self.clock.now(), interval);
        }
        debug!(index = self.index, "rotator moved manually");
        self.publish();
    }

    fn publish(&self) {
        let next = self.snapshot();
        self.notifier.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl TimerDriven for TimedRotator {
    fn next_deadline(&self) -> Option<Instant> {
        if self.disposed {
            return None;
        }
        self.tick.deadline()
    }

    fn poll_timers(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        let now = self.clock.now();
        let mut fired = 0;
        while self.tick.take_due(now).is_some() {
            self.advance();
            fired += 1;
        }
        fired
    }
}

impl Drop for TimedRotator {
    fn drop(&mut self) {
        self.tick.cancel();
    }
}
