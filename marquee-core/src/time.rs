//! Time abstraction and single-slot timers
//!
//! Every primitive in this crate reads time through a [`TimeProvider`] and
//! keeps its pending work as a deadline inside a [`TimerSlot`]. The host event
//! loop asks for [`TimerDriven::next_deadline`], waits until then, and calls
//! [`TimerDriven::poll_timers`] on the same thread that delivers pointer
//! events. Because the deadline lives inside the instance, a disposed or
//! dropped instance has nothing left that could fire.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of the current instant for timer bookkeeping
pub trait TimeProvider: fmt::Debug + Send + Sync + 'static {
    /// Get the current instant
    fn now(&self) -> Instant;
}

/// Production time provider that uses the monotonic system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for tests and script replay.
///
/// Clones share the same underlying instant.
#[derive(Clone, Debug)]
pub struct VirtualTimeProvider {
    instant: Arc<Mutex<Instant>>,
    base_instant: Instant,
}

impl Default for VirtualTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTimeProvider {
    /// Create a virtual clock anchored at the real current instant
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            instant: Arc::new(Mutex::new(now)),
            base_instant: now,
        }
    }

    /// Advance time by a duration
    pub fn advance(&self, duration: Duration) {
        *self.instant.lock() += duration;
    }

    /// Move the clock to `instant`. Attempts to move backwards are ignored.
    pub fn set_instant(&self, instant: Instant) {
        let mut current = self.instant.lock();
        if instant > *current {
            *current = instant;
        }
    }

    /// Instant the clock was created at
    pub fn base(&self) -> Instant {
        self.base_instant
    }

    /// Virtual time elapsed since creation
    pub fn elapsed(&self) -> Duration {
        self.now().saturating_duration_since(self.base_instant)
    }

    /// Instant `offset` after the clock's base
    pub fn at(&self, offset: Duration) -> Instant {
        self.base_instant + offset
    }
}

impl TimeProvider for VirtualTimeProvider {
    fn now(&self) -> Instant {
        *self.instant.lock()
    }
}

/// Shared handle to a clock
pub type SharedClock = Arc<dyn TimeProvider>;

/// Identifies one scheduling of a timer.
///
/// Tokens are unique process-wide, so a token kept past a re-arm, a cancel or
/// a dispose no longer matches anything and delivering it does nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric id, for logs and snapshots.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug)]
struct ArmedTimer {
    token: TimerToken,
    deadline: Instant,
    period: Option<Duration>,
}

/// Holds at most one outstanding timer.
///
/// Arming always replaces whatever was armed before.
#[derive(Debug, Default)]
pub struct TimerSlot {
    armed: Option<ArmedTimer>,
}

impl TimerSlot {
    /// Empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer that expires `delay` after `now`
    pub fn arm_once(&mut self, now: Instant, delay: Duration) -> TimerToken {
        self.arm(now, delay, None)
    }

    /// Arm a repeating timer with a fixed `period`
    pub fn arm_every(&mut self, now: Instant, period: Duration) -> TimerToken {
        self.arm(now, period, Some(period))
    }

    fn arm(
        &mut self,
        now: Instant,
        delay: Duration,
        period: Option<Duration>,
    ) -> TimerToken {
        if let Some(previous) = self.armed.take() {
            tracing::trace!("replacing {}", previous.token);
        }
        let token = TimerToken::next();
        self.armed = Some(ArmedTimer {
            token,
            deadline: now + delay,
            period,
        });
        tracing::trace!(?delay, repeating = period.is_some(), "armed {token}");
        token
    }

    /// Cancel the outstanding timer, returning its token
    pub fn cancel(&mut self) -> Option<TimerToken> {
        let cancelled = self.armed.take().map(|armed| armed.token);
        if let Some(token) = cancelled {
            tracing::trace!("cancelled {token}");
        }
        cancelled
    }

    /// True while a timer is pending.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Token of the pending timer.
    pub fn token(&self) -> Option<TimerToken> {
        self.armed.map(|armed| armed.token)
    }

    /// Deadline of the pending timer.
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|armed| armed.deadline)
    }

    /// Consume one expiry if the deadline has passed.
    ///
    /// One-shot timers disarm; repeating timers move their deadline forward by
    /// one period so the cadence does not drift when polled late.
    pub fn take_due(&mut self, now: Instant) -> Option<TimerToken> {
        let armed = self.armed?;
        if armed.deadline > now {
            return None;
        }
        self.expire(armed);
        Some(armed.token)
    }

    /// Deliver an expiry for `token` regardless of the deadline.
    ///
    /// Returns false when the token is stale.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        match self.armed {
            Some(armed) if armed.token == token => {
                self.expire(armed);
                true
            }
            _ => {
                tracing::trace!("ignoring stale {token}");
                false
            }
        }
    }

    fn expire(&mut self, armed: ArmedTimer) {
        self.armed = armed.period.map(|period| ArmedTimer {
            deadline: armed.deadline + period,
            ..armed
        });
    }
}

/// Something that owns timers and can be polled by a host loop
pub trait TimerDriven {
    /// Earliest pending deadline, if any
    fn next_deadline(&self) -> Option<Instant>;

    /// Fire every timer that is due according to the instance's clock.
    /// Returns how many expiries were handled.
    fn poll_timers(&mut self) -> usize;
}

/// Run a virtual clock forward to `target`, stopping at every deadline on the
/// way so expiries are delivered in deadline order.
///
/// All `instances` must read time from `clock`.
pub fn drive_until(
    clock: &VirtualTimeProvider,
    instances: &mut [&mut dyn TimerDriven],
    target: Instant,
) -> usize {
    let mut fired = 0;
    loop {
        let next = instances
            .iter()
            .filter_map(|instance| instance.next_deadline())
            .filter(|deadline| *deadline <= target)
            .min();

        match next {
            Some(deadline) => {
                clock.set_instant(deadline);
                let before = fired;
                for instance in instances.iter_mut() {
                    fired += instance.poll_timers();
                }
                if fired == before {
                    // A deadline at or before `now` that nobody consumes would
                    // loop forever.
                    tracing::warn!("deadline {deadline:?} produced no expiry");
                    break;
                }
            }
            None => break,
        }
    }
    clock.set_instant(target);
    for instance in instances.iter_mut() {
        fired += instance.poll_timers();
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_time_advance() {
        let provider = VirtualTimeProvider::new();
        let start = provider.now();

        provider.advance(Duration::from_secs(10));

        assert_eq!(provider.now() - start, Duration::from_secs(10));
        assert_eq!(provider.elapsed(), Duration::from_secs(10));
    }

    #[test]
    fn test_virtual_time_is_shared_between_clones() {
        let provider = VirtualTimeProvider::new();
        let clone = provider.clone();

        clone.advance(Duration::from_millis(250));

        assert_eq!(provider.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_set_instant_never_moves_backwards() {
        let provider = VirtualTimeProvider::new();
        provider.advance(Duration::from_secs(2));

        provider.set_instant(provider.at(Duration::from_secs(1)));

        assert_eq!(provider.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_arming_replaces_previous_timer() {
        let clock = VirtualTimeProvider::new();
        let mut slot = TimerSlot::new();

        let first = slot.arm_once(clock.now(), Duration::from_millis(300));
        let second = slot.arm_once(clock.now(), Duration::from_millis(300));

        assert_ne!(first, second);
        assert_eq!(slot.token(), Some(second));
        assert!(!slot.fire(first));
        assert!(slot.is_armed());
    }

    #[test]
    fn test_one_shot_disarms_after_expiry() {
        let clock = VirtualTimeProvider::new();
        let mut slot = TimerSlot::new();
        let token = slot.arm_once(clock.now(), Duration::from_millis(300));

        clock.advance(Duration::from_millis(299));
        assert_eq!(slot.take_due(clock.now()), None);

        clock.advance(Duration::from_millis(1));
        assert_eq!(slot.take_due(clock.now()), Some(token));
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_repeating_timer_keeps_cadence_when_polled_late() {
        let clock = VirtualTimeProvider::new();
        let mut slot = TimerSlot::new();
        slot.arm_every(clock.now(), Duration::from_secs(5));

        clock.advance(Duration::from_secs(11));
        let mut expiries = 0;
        while slot.take_due(clock.now()).is_some() {
            expiries += 1;
        }

        assert_eq!(expiries, 2);
        assert_eq!(slot.deadline(), Some(clock.at(Duration::from_secs(15))));
    }

    #[test]
    fn test_cancel_makes_token_stale() {
        let clock = VirtualTimeProvider::new();
        let mut slot = TimerSlot::new();
        let token = slot.arm_every(clock.now(), Duration::from_secs(1));

        assert_eq!(slot.cancel(), Some(token));
        assert!(!slot.fire(token));
        assert_eq!(slot.cancel(), None);
    }
}
