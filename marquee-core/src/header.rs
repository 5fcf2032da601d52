//! Site header controller
//!
//! Combines the desktop dropdown menu, the mobile drawer with its accordion
//! sections, and the "scrolled" flag that switches the header from a
//! transparent overlay to a solid bar.

use std::fmt::Debug;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::constants::HEADER_SCROLLED_THRESHOLD_PX;
use crate::error::{InteractionError, Result};
use crate::menu::{HoverIntentMenu, MenuSnapshot};
use crate::time::{SharedClock, TimerDriven};

/// Serializable view of the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSnapshot<K, S = K> {
    /// Page scrolled past the style threshold.
    pub scrolled: bool,
    /// Mobile drawer open.
    pub mobile_open: bool,
    /// Shared desktop menu and mobile accordion.
    pub menu: MenuSnapshot<K, S>,
}

/// Site header: scroll styling, mobile drawer and the navigation menu.
#[derive(Debug)]
pub struct SiteHeader<K, S = K>
where
    K: Clone + Eq + Debug,
    S: Clone + Eq + Debug,
{
    menu: HoverIntentMenu<K, S>,
    mobile_open: bool,
    scrolled: bool,
    scrolled_threshold: f32,
}

impl<K, S> SiteHeader<K, S>
where
    K: Clone + Eq + Debug,
    S: Clone + Eq + Debug,
{
    /// Wraps `menu`. The header is scrolled above `scrolled_threshold` px.
    pub fn new(menu: HoverIntentMenu<K, S>, scrolled_threshold: f32) -> Self {
        Self {
            menu,
            mobile_open: false,
            scrolled: false,
            scrolled_threshold,
        }
    }

    /// Header with the default close delay and scroll threshold.
    pub fn with_defaults(clock: SharedClock) -> Self {
        Self::new(
            HoverIntentMenu::with_default_delay(clock),
            HEADER_SCROLLED_THRESHOLD_PX,
        )
    }

    /// Window scrolled to `offset_y`. Returns whether the scrolled flag
    /// flipped.
    pub fn set_scroll_offset(&mut self, offset_y: f32) -> Result<bool> {
        self.ensure_live("set_scroll_offset")?;
        let scrolled = offset_y > self.scrolled_threshold;
        if scrolled == self.scrolled {
            return Ok(false);
        }
        debug!(offset_y, scrolled, "header style changed");
        self.scrolled = scrolled;
        Ok(true)
    }

    /// Hamburger button. Collapsing the drawer also collapses any open
    /// accordion section.
    pub fn toggle_mobile(&mut self) -> Result<()> {
        self.ensure_live("toggle_mobile")?;
        self.mobile_open = !self.mobile_open;
        if !self.mobile_open {
            self.menu.close()?;
        }
        debug!(open = self.mobile_open, "mobile drawer toggled");
        Ok(())
    }

    /// Accordion section tapped inside the mobile drawer.
    pub fn toggle_section(&mut self, id: K) -> Result<()> {
        self.ensure_live("toggle_section")?;
        if !self.mobile_open {
            return Ok(());
        }
        self.menu.click(id)
    }

    /// Desktop dropdowns
    pub fn menu(&self) -> &HoverIntentMenu<K, S> {
        &self.menu
    }

    /// Mutable navigation menu, for pointer events.
    pub fn menu_mut(&mut self) -> &mut HoverIntentMenu<K, S> {
        &mut self.menu
    }

    /// True above the scroll threshold.
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// True while the mobile drawer is open.
    pub fn is_mobile_open(&self) -> bool {
        self.mobile_open
    }

    /// Current header state.
    pub fn snapshot(&self) -> HeaderSnapshot<K, S> {
        HeaderSnapshot {
            scrolled: self.scrolled,
            mobile_open: self.mobile_open,
            menu: self.menu.snapshot(),
        }
    }

    /// Disposes the menu and rejects further header calls.
    pub fn dispose(&mut self) -> Result<()> {
        self.menu.dispose()
    }

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.menu.is_disposed() {
            return Err(InteractionError::UseAfterDispose(operation));
        }
        Ok(())
    }
}

impl<K, S> TimerDriven for SiteHeader<K, S>
where
    K: Clone + Eq + Debug,
    S: Clone + Eq + Debug,
{
    fn next_deadline(&self) -> Option<Instant> {
        self.menu.next_deadline()
    }

    fn poll_timers(&mut self) -> usize {
        self.menu.poll_timers()
    }
}
