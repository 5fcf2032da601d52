//! Interaction primitives for the marketing site views.
//!
//! The view layer owns content (slides, menu entries, testimonials) and
//! paints from the snapshots exposed here. These types own the state
//! transitions and the timers behind them:
//!
//! - [`menu`] - hover-intent dropdowns with delayed close
//! - [`rotator`] - auto-advancing carousel index
//! - [`notice`] - self-dismissing toasts
//! - [`contact`] - contact form submission with its outcome toast
//! - [`reveal`] - scroll-triggered section reveals
//! - [`header`] - header controller (dropdowns, mobile drawer, scroll style)
//! - [`time`] - clocks, single-slot timers and the polling seam
//!
//! Everything runs on one thread. Hosts poll [`time::TimerDriven`]
//! instances from the same loop that delivers pointer events, so a
//! cancellation made by an event handler always lands before the timer
//! would have fired.

pub mod constants;
pub mod contact;
/// Error type shared by every primitive.
pub mod error;
pub mod header;
pub mod menu;
pub mod notice;
pub mod reveal;
pub mod rotator;
pub mod time;

pub use contact::{ContactSnapshot, ContactSubmission};
pub use error::{InteractionError, Result};
pub use header::{HeaderSnapshot, SiteHeader};
pub use menu::{
    HoverIntentMenu, MenuMessage, MenuPhase, MenuSnapshot, menu_update,
};
pub use notice::{Notice, NoticeTone, TimedNotice};
pub use reveal::{RevealChange, RevealTracker, Span, intersection_ratio};
pub use rotator::{
    RotatorMessage, RotatorSnapshot, TimedRotator, rotator_update,
};
pub use time::{
    SharedClock, SystemTimeProvider, TimeProvider, TimerDriven, TimerSlot,
    TimerToken, VirtualTimeProvider, drive_until,
};
