use std::fmt::Debug;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::constants::MENU_CLOSE_DELAY_MS;
use crate::error::{InteractionError, Result};
use crate::time::{SharedClock, TimerDriven, TimerSlot, TimerToken};

/// What the view paints: the open top-level menu and its open sub-panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSnapshot<K, S = K> {
    /// Open top-level menu.
    pub open: Option<K>,
    /// Open sub-panel inside it.
    pub open_sub: Option<S>,
}

impl<K, S> Default for MenuSnapshot<K, S> {
    fn default() -> Self {
        Self {
            open: None,
            open_sub: None,
        }
    }
}

/// The three shapes a menu can be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuPhase<K, S = K> {
    /// Nothing open
    Closed,
    /// Top-level menu open
    Open(K),
    /// Top-level menu and one of its sub-panels open
    OpenWithSub(K, S),
}

/// Hover-intent controller for a set of mutually exclusive dropdowns.
///
/// Leaving a trigger, panel or sub-panel does not close the menu right away.
/// A close is scheduled `close_delay` later, and entering any part of the
/// menu before then cancels it. That gap is what lets the pointer travel from
/// a trigger to its panel without the panel vanishing under it.
///
/// Sub-panels never get a timer of their own: leaving one schedules a close
/// of the whole menu, exactly like leaving the top level.
#[derive(Debug)]
pub struct HoverIntentMenu<K, S = K>
where
    K: Clone + Eq + Debug,
    S: Clone + Eq + Debug,
{
    open: Option<K>,
    open_sub: Option<S>,
    close_timer: TimerSlot,
    close_delay: Duration,
    clock: SharedClock,
    disposed: bool,
    notifier: watch::Sender<MenuSnapshot<K, S>>,
}

impl<K, S> HoverIntentMenu<K, S>
where
    K: Clone + Eq + Debug,
    S: Clone + Eq + Debug,
{
    /// Create a closed menu that waits `close_delay` before closing.
    pub fn new(clock: SharedClock, close_delay: Duration) -> Result<Self> {
        if close_delay.is_zero() {
            return Err(InteractionError::InvalidConfiguration(
                "menu close delay must be greater than zero".to_string(),
            ));
        }

        Ok(Self::build(clock, close_delay))
    }

    /// Create a closed menu with the site's standard 300 ms close delay.
    pub fn with_default_delay(clock: SharedClock) -> Self {
        Self::build(clock, Duration::from_millis(MENU_CLOSE_DELAY_MS))
    }

    fn build(clock: SharedClock, close_delay: Duration) -> Self {
        let (notifier, _) = watch::channel(MenuSnapshot::default());
        Self {
            open: None,
            open_sub: None,
            close_timer: TimerSlot::new(),
            close_delay,
            clock,
            disposed: false,
            notifier,
        }
    }

    // ========== POINTER AND CLICK EVENTS ==========

    /// Pointer entered the trigger or the panel belonging to `id`.
    ///
    /// Cancels any pending close and opens `id`, replacing whatever top-level
    /// menu was open.
    pub fn pointer_enter(&mut self, id: K) -> Result<()> {
        self.ensure_live("pointer_enter")?;
        self.close_timer.cancel();
        self.open_top(id);
        self.publish();
        Ok(())
    }

    /// Pointer left a trigger or panel. Schedules a close of the whole menu.
    pub fn pointer_leave(&mut self) -> Result<()> {
        self.ensure_live("pointer_leave")?;
        self.schedule_close();
        Ok(())
    }

    /// Trigger clicked: toggles `id`, or switches directly to it when another
    /// menu is open.
    pub fn click(&mut self, id: K) -> Result<()> {
        self.ensure_live("click")?;
        self.close_timer.cancel();

        if self.open.as_ref() == Some(&id) {
            debug!(?id, "menu closed by click");
            self.open = None;
            self.open_sub = None;
        } else {
            self.open_top(id);
        }

        self.publish();
        Ok(())
    }

    /// Pointer entered the nested trigger or sub-panel `sub`.
    ///
    /// Ignored while no top-level menu is open.
    pub fn sub_pointer_enter(&mut self, sub: S) -> Result<()> {
        self.ensure_live("sub_pointer_enter")?;
        if self.open.is_none() {
            trace!(?sub, "sub-panel enter ignored, menu closed");
            return Ok(());
        }

        self.close_timer.cancel();
        self.open_sub_panel(sub);
        self.publish();
        Ok(())
    }

    /// Nested trigger clicked: opens `sub`, or closes it when it is already
    /// the open sub-panel.
    pub fn sub_click(&mut self, sub: S) -> Result<()> {
        self.ensure_live("sub_click")?;
        if self.open.is_none() {
            trace!(?sub, "sub-panel click ignored, menu closed");
            return Ok(());
        }

        self.close_timer.cancel();
        if self.open_sub.as_ref() == Some(&sub) {
            debug!(?sub, "sub-panel closed by click");
            self.open_sub = None;
        } else {
            self.open_sub_panel(sub);
        }
        self.publish();
        Ok(())
    }

    /// Pointer left a sub-panel. Treated as leaving the whole menu.
    pub fn sub_pointer_leave(&mut self) -> Result<()> {
        self.ensure_live("sub_pointer_leave")?;
        self.schedule_close();
        Ok(())
    }

    /// Close immediately, e.g. after navigating or when a drawer collapses.
    pub fn close(&mut self) -> Result<()> {
        self.ensure_live("close")?;
        self.close_timer.cancel();
        self.close_now();
        Ok(())
    }

    /// Deliver the expiry of a previously scheduled close.
    ///
    /// Stale tokens and disposed menus are ignored rather than reported, since
    /// the caller is a timer, not a user action. Returns whether the menu
    /// closed.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.disposed {
            trace!("timer {token} delivered after dispose, ignored");
            return false;
        }
        if !self.close_timer.fire(token) {
            return false;
        }
        self.close_now();
        true
    }

    /// Tear down: cancel the pending close. Every later call fails with
    /// [`InteractionError::UseAfterDispose`].
    pub fn dispose(&mut self) -> Result<()> {
        self.ensure_live("dispose")?;
        self.close_timer.cancel();
        self.disposed = true;
        debug!("menu disposed");
        Ok(())
    }

    // ========== QUERIES ==========

    /// Owned copy of the open menu and sub-panel.
    pub fn snapshot(&self) -> MenuSnapshot<K, S> {
        MenuSnapshot {
            open: self.open.clone(),
            open_sub: self.open_sub.clone(),
        }
    }

    /// Same state as [`Self::snapshot`], as a phase.
    pub fn phase(&self) -> MenuPhase<K, S> {
        match (&self.open, &self.open_sub) {
            (None, _) => MenuPhase::Closed,
            (Some(id), None) => MenuPhase::Open(id.clone()),
            (Some(id), Some(sub)) => {
                MenuPhase::OpenWithSub(id.clone(), sub.clone())
            }
        }
    }

    /// Open top-level id.
    pub fn open_id(&self) -> Option<&K> {
        self.open.as_ref()
    }

    /// Open sub-panel id.
    pub fn open_sub_id(&self) -> Option<&S> {
        self.open_sub.as_ref()
    }

    /// True when `id` is the open menu.
    pub fn is_open(&self, id: &K) -> bool {
        self.open.as_ref() == Some(id)
    }

    /// Whether a delayed close is outstanding
    pub fn close_pending(&self) -> bool {
        self.close_timer.is_armed()
    }

    /// Token of the outstanding close, for hosts that deliver timers by token
    pub fn pending_close(&self) -> Option<TimerToken> {
        self.close_timer.token()
    }

    /// Delay between leaving and closing.
    pub fn close_delay(&self) -> Duration {
        self.close_delay
    }

    /// True once `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Receive a new snapshot every time the open menu or sub-panel changes.
    pub fn subscribe(&self) -> watch::Receiver<MenuSnapshot<K, S>> {
        self.notifier.subscribe()
    }

    // ========== INTERNALS ==========

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.disposed {
            return Err(InteractionError::UseAfterDispose(operation));
        }
        Ok(())
    }

    fn open_top(&mut self, id: K) {
        if self.open.as_ref() != Some(&id) {
            debug!(?id, previous = ?self.open, "menu opened");
            // A sub-panel belongs to the menu that opened it.
            self.open_sub = None;
            self.open = Some(id);
        }
    }

    fn open_sub_panel(&mut self, sub: S) {
        if self.open_sub.as_ref() != Some(&sub) {
            debug!(?sub, "sub-panel opened");
            self.open_sub = Some(sub);
        }
    }

    fn schedule_close(&mut self) {
        if self.open.is_none() {
            trace!("pointer left a closed menu");
            return;
        }
        let now = self.clock.now();
        self.close_timer.arm_once(now, self.close_delay);
    }

    fn close_now(&mut self) {
        if self.open.is_some() {
            debug!(closed = ?self.open, "menu closed");
        }
        self.open = None;
        self.open_sub = None;
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

impl<K, S> TimerDriven for HoverIntentMenu<K, S>
where
    K: Clone + Eq + Debug,
    S: Clone + Eq + Debug,
{
    fn next_deadline(&self) -> Option<Instant> {
        if self.disposed {
            return None;
        }
        self.close_timer.deadline()
    }

    fn poll_timers(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        match self.close_timer.take_due(self.clock.now()) {
            Some(token) => {
                trace!("close {token} expired");
                self.close_now();
                1
            }
            None => 0,
        }
    }
}

impl<K, S> Drop for HoverIntentMenu<K, S>
where
    K: Clone + Eq + Debug,
    S: Clone + Eq + Debug,
{
    fn drop(&mut self) {
        self.close_timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::VirtualTimeProvider;
    use std::sync::Arc;

    fn menu() -> (VirtualTimeProvider, HoverIntentMenu<&'static str>) {
        let clock = VirtualTimeProvider::new();
        let menu = HoverIntentMenu::with_default_delay(Arc::new(clock.clone()));
        (clock, menu)
    }

    #[test]
    fn rejects_zero_close_delay() {
        let clock = Arc::new(VirtualTimeProvider::new());
        let result = HoverIntentMenu::<u8>::new(clock, Duration::ZERO);
        assert!(matches!(
            result,
            Err(InteractionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn enter_opens_and_leave_closes_after_delay() {
        let (clock, mut menu) = menu();

        menu.pointer_enter("services").unwrap();
        assert_eq!(menu.phase(), MenuPhase::Open("services"));

        menu.pointer_leave().unwrap();
        assert!(menu.close_pending());

        clock.advance(Duration::from_millis(299));
        assert_eq!(menu.poll_timers(), 0);
        assert!(menu.is_open(&"services"));

        clock.advance(Duration::from_millis(1));
        assert_eq!(menu.poll_timers(), 1);
        assert_eq!(menu.phase(), MenuPhase::Closed);
        assert!(!menu.close_pending());
    }

    #[test]
    fn entering_panel_cancels_pending_close() {
        let (clock, mut menu) = menu();
        menu.pointer_enter("services").unwrap();
        menu.pointer_leave().unwrap();

        clock.advance(Duration::from_millis(150));
        menu.pointer_enter("services").unwrap();
        assert!(!menu.close_pending());

        clock.advance(Duration::from_secs(1));
        assert_eq!(menu.poll_timers(), 0);
        assert!(menu.is_open(&"services"));
    }

    #[test]
    fn repeated_leave_keeps_a_single_timer() {
        let (clock, mut menu) = menu();
        menu.pointer_enter("industries").unwrap();

        menu.pointer_leave().unwrap();
        let first = menu.pending_close().unwrap();
        clock.advance(Duration::from_millis(200));
        menu.sub_pointer_leave().unwrap();
        let second = menu.pending_close().unwrap();

        assert_ne!(first, second);
        assert!(!menu.on_timer(first));

        // The replacement timer counts from the second leave.
        clock.advance(Duration::from_millis(200));
        assert_eq!(menu.poll_timers(), 0);
        clock.advance(Duration::from_millis(100));
        assert_eq!(menu.poll_timers(), 1);
    }

    #[test]
    fn click_toggles_and_switches() {
        let (_clock, mut menu) = menu();

        menu.click("services").unwrap();
        assert_eq!(menu.phase(), MenuPhase::Open("services"));

        menu.click("sapSolutions").unwrap();
        assert_eq!(menu.phase(), MenuPhase::Open("sapSolutions"));

        menu.click("sapSolutions").unwrap();
        assert_eq!(menu.phase(), MenuPhase::Closed);
    }

    #[test]
    fn click_cancels_pending_close() {
        let (clock, mut menu) = menu();
        menu.pointer_enter("services").unwrap();
        menu.pointer_leave().unwrap();

        menu.click("industries").unwrap();
        clock.advance(Duration::from_secs(1));

        assert_eq!(menu.poll_timers(), 0);
        assert!(menu.is_open(&"industries"));
    }

    #[test]
    fn sub_panel_follows_its_parent() {
        let (_clock, mut menu) = menu();
        menu.pointer_enter("services").unwrap();
        menu.sub_pointer_enter("consulting").unwrap();
        assert_eq!(
            menu.phase(),
            MenuPhase::OpenWithSub("services", "consulting")
        );

        menu.sub_click("professionalServices").unwrap();
        assert_eq!(menu.open_sub_id(), Some(&"professionalServices"));

        // Re-entering the same trigger keeps the sub-panel.
        menu.pointer_enter("services").unwrap();
        assert_eq!(menu.open_sub_id(), Some(&"professionalServices"));

        // Switching top-level menus clears it.
        menu.pointer_enter("sapSolutions").unwrap();
        assert_eq!(menu.phase(), MenuPhase::Open("sapSolutions"));
    }

    #[test]
    fn sub_click_on_open_sub_closes_only_the_sub() {
        let (_clock, mut menu) = menu();
        menu.click("services").unwrap();
        menu.sub_click("consulting").unwrap();
        menu.sub_click("consulting").unwrap();

        assert_eq!(menu.phase(), MenuPhase::Open("services"));
    }

    #[test]
    fn sub_events_on_closed_menu_are_ignored() {
        let (_clock, mut menu) = menu();

        menu.sub_pointer_enter("consulting").unwrap();
        menu.sub_click("consulting").unwrap();
        menu.sub_pointer_leave().unwrap();

        assert_eq!(menu.phase(), MenuPhase::Closed);
        assert!(!menu.close_pending());
    }

    #[test]
    fn leaving_sub_panel_closes_whole_menu() {
        let (clock, mut menu) = menu();
        menu.pointer_enter("sapSolutions").unwrap();
        menu.sub_pointer_enter("sapProducts").unwrap();
        menu.sub_pointer_leave().unwrap();

        clock.advance(Duration::from_millis(300));
        menu.poll_timers();

        assert_eq!(menu.snapshot(), MenuSnapshot::default());
    }

    #[test]
    fn explicit_close_cancels_timer() {
        let (_clock, mut menu) = menu();
        menu.pointer_enter("services").unwrap();
        menu.pointer_leave().unwrap();

        menu.close().unwrap();

        assert_eq!(menu.phase(), MenuPhase::Closed);
        assert!(!menu.close_pending());
    }

    #[test]
    fn dispose_blocks_further_use_and_timers() {
        let (clock, mut menu) = menu();
        menu.pointer_enter("services").unwrap();
        menu.pointer_leave().unwrap();
        let token = menu.pending_close().unwrap();

        menu.dispose().unwrap();

        assert!(!menu.on_timer(token));
        clock.advance(Duration::from_secs(1));
        assert_eq!(menu.next_deadline(), None);
        assert_eq!(menu.poll_timers(), 0);
        assert_eq!(menu.phase(), MenuPhase::Open("services"));

        assert_eq!(
            menu.click("services"),
            Err(InteractionError::UseAfterDispose("click"))
        );
        assert_eq!(
            menu.dispose(),
            Err(InteractionError::UseAfterDispose("dispose"))
        );
    }

    #[test]
    fn subscribers_only_see_real_changes() {
        let (_clock, mut menu) = menu();
        let mut rx = menu.subscribe();

        menu.pointer_enter("services").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().open, Some("services"));

        menu.pointer_enter("services").unwrap();
        menu.pointer_leave().unwrap();
        assert!(!rx.has_changed().unwrap());
    }
}
