use thiserror::Error;

use crate::models::InteractionConfig;

/// Config values the primitives would reject at construction time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigGuardRailError {
    /// A delay, interval or lifetime of zero
    #[error("{field} must be greater than zero")]
    ZeroDuration {
        /// Dotted config key
        field: &'static str,
    },
    /// A ratio outside `(0, 1]`
    #[error("{field} must be within (0, 1], got {value}")]
    RatioOutOfRange {
        /// Dotted config key
        field: &'static str,
        /// Rejected value
        value: f32,
    },
    /// A negative or non-finite pixel offset
    #[error("{field} must be a finite, non-negative offset, got {value}")]
    InvalidOffset {
        /// Dotted config key
        field: &'static str,
        /// Rejected value
        value: f32,
    },
}

/// A config value that works but will likely feel wrong to visitors.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// What is off
    pub message: String,
    /// How to fix it, when there is an obvious fix
    pub hint: Option<String>,
}

/// Warnings collected by [`apply_guard_rails`].
#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    /// Warnings in the order they were found
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    /// Record a warning without a hint.
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    /// Record a warning with a suggested fix.
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    /// Whether nothing was flagged
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

const MIN_READABLE_INTERVAL_MS: u64 = 1_000;
const MAX_COMFORTABLE_STAGGER_MS: u64 = 1_000;

/// Reject configs that cannot build working primitives and collect warnings
/// for ones that build but behave poorly.
pub fn apply_guard_rails(
    config: &InteractionConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    non_zero("menu.close_delay_ms", config.menu.close_delay_ms)?;
    non_zero("hero.interval_ms", config.hero.interval_ms)?;
    non_zero("testimonials.interval_ms", config.testimonials.interval_ms)?;
    non_zero("notice.display_ms", config.notice.display_ms)?;
    non_zero("contact.submit_delay_ms", config.contact.submit_delay_ms)?;

    let threshold = config.reveal.threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(ConfigGuardRailError::RatioOutOfRange {
            field: "reveal.threshold",
            value: threshold,
        });
    }

    let offset = config.header.scrolled_threshold_px;
    if !offset.is_finite() || offset < 0.0 {
        return Err(ConfigGuardRailError::InvalidOffset {
            field: "header.scrolled_threshold_px",
            value: offset,
        });
    }

    if config.menu.close_delay_ms > 2_000 {
        warnings.push_with_hint(
            format!(
                "menu.close_delay_ms is {}; menus will linger after the pointer leaves",
                config.menu.close_delay_ms
            ),
            "Delays between 200 and 500 ms usually feel right",
        );
    }

    for (name, carousel) in
        [("hero", &config.hero), ("testimonials", &config.testimonials)]
    {
        if carousel.autoplay && carousel.interval_ms < MIN_READABLE_INTERVAL_MS {
            warnings.push_with_hint(
                format!(
                    "{name}.interval_ms is {}; slides will change before they can be read",
                    carousel.interval_ms
                ),
                "Raise the interval or disable autoplay",
            );
        }
    }

    if config.reveal.stagger_ms > MAX_COMFORTABLE_STAGGER_MS {
        warnings.push(format!(
            "reveal.stagger_ms is {}; later children appear long after their section",
            config.reveal.stagger_ms
        ));
    }

    Ok(warnings)
}

fn non_zero(field: &'static str, value: u64) -> Result<(), ConfigGuardRailError> {
    if value == 0 {
        return Err(ConfigGuardRailError::ZeroDuration { field });
    }
    Ok(())
}
