//! Auto-advancing index for carousels

/// View messages.
pub mod messages;
/// Rotator state and timer.
pub mod state;
/// Message dispatch.
pub mod update;

pub use messages::RotatorMessage;
pub use state::{RotatorSnapshot, TimedRotator};
pub use update::rotator_update;
