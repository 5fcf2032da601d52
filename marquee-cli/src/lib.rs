//! Scripted replay of site interactions on a virtual clock.
//!
//! A script is a list of timestamped events addressed to the header menu,
//! the two carousels, the contact form, the toast or the reveal tracker.
//! [`replay::replay`] applies them in time order, fires every timer that comes due in between
//! and writes one JSON line per observable state change.

/// Event application and snapshot output.
pub mod replay;
pub mod script;

pub use replay::{ReplayOptions, replay};
pub use script::{
    Command, ContactAction, HeaderAction, NoticeAction, RevealAction, Script,
    ScriptEvent, ScriptSection,
};
