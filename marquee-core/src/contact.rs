//! Contact form submission
//!
//! Submitting the form puts it into a sending state for a fixed delay. When
//! the delay ends the form resets and a toast confirms the send. A failure
//! reported while sending ends the submission early with an error toast and
//! keeps the fields. The form cannot be submitted twice at once.

use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::constants::{
    CONTACT_FAILURE_MESSAGE, CONTACT_SUBMIT_DELAY_MS, CONTACT_SUCCESS_MESSAGE,
};
use crate::error::{InteractionError, Result};
use crate::notice::{Notice, TimedNotice};
use crate::time::{SharedClock, TimerDriven, TimerSlot, TimerToken};

/// What the contact view renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContactSnapshot {
    /// A send is in flight; the submit button shows a spinner.
    pub submitting: bool,
    /// Completed sends. The view clears its fields whenever this changes.
    pub sent: u64,
}

/// Submission lifecycle of the contact form, with the toast that reports
/// the outcome.
#[derive(Debug)]
pub struct ContactSubmission {
    submitting: bool,
    sent: u64,
    completion: TimerSlot,
    delay: Duration,
    clock: SharedClock,
    notice: TimedNotice,
    disposed: bool,
    notifier: watch::Sender<ContactSnapshot>,
}

impl ContactSubmission {
    /// Create an idle form whose sends take `delay` and report through
    /// `notice`.
    pub fn new(
        clock: SharedClock,
        notice: TimedNotice,
        delay: Duration,
    ) -> Result<Self> {
        if delay.is_zero() {
            return Err(InteractionError::InvalidConfiguration(
                "contact submit delay must be greater than zero".to_string(),
            ));
        }
        Ok(Self::build(clock, notice, delay))
    }

    /// Idle form with the site's 1.5 s send and 5 s toast.
    pub fn with_defaults(clock: SharedClock) -> Self {
        let notice = TimedNotice::with_default_duration(clock.clone());
        Self::build(
            clock,
            notice,
            Duration::from_millis(CONTACT_SUBMIT_DELAY_MS),
        )
    }

    fn build(clock: SharedClock, notice: TimedNotice, delay: Duration) -> Self {
        Self {
            submitting: false,
            sent: 0,
            completion: TimerSlot::new(),
            delay,
            clock,
            notice,
            disposed: false,
            notifier: watch::channel(ContactSnapshot::default()).0,
        }
    }

    /// Form submitted. Fails with [`InteractionError::SubmissionInFlight`]
    /// while the previous send is still running.
    pub fn submit(&mut self) -> Result<()> {
        self.ensure_live("submit")?;
        if self.submitting {
            return Err(InteractionError::SubmissionInFlight);
        }
        self.submitting = true;
        self.completion.arm_once(self.clock.now(), self.delay);
        debug!(delay = ?self.delay, "contact form submitting");
        self.publish();
        Ok(())
    }

    /// The in-flight send failed. Shows the error toast and keeps the
    /// fields. No-op when nothing is in flight.
    pub fn fail(&mut self) -> Result<()> {
        self.ensure_live("fail")?;
        if !self.submitting {
            trace!("failure reported with no submission in flight");
            return Ok(());
        }
        self.completion.cancel();
        self.finish(Notice::error(CONTACT_FAILURE_MESSAGE), false);
        Ok(())
    }

    /// Deliver the completion of a send by token. Returns whether it
    /// completed a submission.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.disposed || !self.completion.fire(token) {
            return false;
        }
        self.finish(Notice::success(CONTACT_SUCCESS_MESSAGE), true);
        true
    }

    /// Tear down: cancel the pending completion and dispose the toast.
    pub fn dispose(&mut self) -> Result<()> {
        self.ensure_live("dispose")?;
        self.completion.cancel();
        if !self.notice.is_disposed() {
            self.notice.dispose()?;
        }
        self.disposed = true;
        debug!("contact form disposed");
        Ok(())
    }

    /// Current sending state and sent count.
    pub fn snapshot(&self) -> ContactSnapshot {
        ContactSnapshot {
            submitting: self.submitting,
            sent: self.sent,
        }
    }

    /// True between `submit` and its outcome.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Token of the outstanding completion
    pub fn pending_completion(&self) -> Option<TimerToken> {
        self.completion.token()
    }

    /// Simulated send time.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// True once `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Outcome toast
    pub fn notice(&self) -> &TimedNotice {
        &self.notice
    }

    /// Mutable outcome toast, for the close button.
    pub fn notice_mut(&mut self) -> &mut TimedNotice {
        &mut self.notice
    }

    /// Receive a new snapshot whenever the sending state or the sent count
    /// changes.
    pub fn subscribe(&self) -> watch::Receiver<ContactSnapshot> {
        self.notifier.subscribe()
    }

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.disposed {
            return Err(InteractionError::UseAfterDispose(operation));
        }
        Ok(())
    }

    fn finish(&mut self, notice: Notice, delivered: bool) {
        self.submitting = false;
        if delivered {
            self.sent += 1;
        }
        debug!(delivered, sent = self.sent, "contact submission finished");
        if let Err(err) = self.notice.show(notice) {
            warn!(%err, "outcome toast not shown");
        }
        self.publish();
    }

    fn publish(&self) {
        self.notifier.send_replace(self.snapshot());
    }
}

impl TimerDriven for ContactSubmission {
    fn next_deadline(&self) -> Option<Instant> {
        if self.disposed {
            return None;
        }
        [self.completion.deadline(), self.notice.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn poll_timers(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        let mut fired = 0;
        if self.completion.take_due(self.clock.now()).is_some() {
            self.finish(Notice::success(CONTACT_SUCCESS_MESSAGE), true);
            fired += 1;
        }
        fired + self.notice.poll_timers()
    }
}

impl Drop for ContactSubmission {
    fn drop(&mut self) {
        self.completion.cancel();
    }
}
