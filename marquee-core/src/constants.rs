//! Default timings and thresholds used by the site views.

/// Delay before a menu closes after the pointer leaves trigger, panel or
/// sub-panel.
pub const MENU_CLOSE_DELAY_MS: u64 = 300;

/// Auto-advance interval shared by the hero and testimonial carousels.
pub const ROTATE_INTERVAL_MS: u64 = 5_000;

/// How long a toast stays visible.
pub const NOTICE_DISPLAY_MS: u64 = 5_000;

/// Fraction of a section that must be visible before it reveals.
pub const REVEAL_THRESHOLD: f32 = 0.1;

/// Delay between consecutive children of a revealing section.
pub const REVEAL_STAGGER_MS: u64 = 200;

/// Scroll offset past which the header switches to its solid style.
pub const HEADER_SCROLLED_THRESHOLD_PX: f32 = 10.0;

/// Simulated send time of the contact form.
pub const CONTACT_SUBMIT_DELAY_MS: u64 = 1_500;

/// Toast shown once the contact form has been sent.
pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Thank you! We'll be in touch within 24 hours.";

/// Toast shown when sending the contact form failed.
pub const CONTACT_FAILURE_MESSAGE: &str =
    "Something went wrong. Please try again.";
