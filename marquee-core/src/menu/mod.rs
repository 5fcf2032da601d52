//! Hover-intent dropdown menus
//!
//! Drives the header dropdowns, their nested sub-panels and the mobile
//! accordion. The view forwards pointer and click events as
//! [`MenuMessage`]s and paints from [`MenuSnapshot`].

/// View messages.
pub mod messages;
/// Menu state machine.
pub mod state;
/// Message dispatch.
pub mod update;

pub use messages::MenuMessage;
pub use state::{HoverIntentMenu, MenuPhase, MenuSnapshot};
pub use update::menu_update;
