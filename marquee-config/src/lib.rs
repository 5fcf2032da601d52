//! Configuration for the marquee interaction primitives.
//!
//! Centralizes the timings (menu close delay, carousel intervals, toast
//! lifetime) and thresholds (reveal ratio, header scroll offset) so the
//! views and the replay tool agree on a single source of defaults.

pub mod controllers;
pub mod models;
/// Environment parsing helpers.
pub mod util;
/// Guard rails applied after loading.
pub mod validation;

pub use controllers::SiteControllers;
pub use models::{
    CarouselConfig, ContactConfig, HeaderConfig, InteractionConfig,
    InteractionConfigSource, MenuConfig, NoticeConfig, RevealConfig,
};
pub use validation::ConfigGuardRailError;
