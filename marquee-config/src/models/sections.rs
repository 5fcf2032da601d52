use marquee_core::constants::{
    CONTACT_SUBMIT_DELAY_MS, HEADER_SCROLLED_THRESHOLD_PX, MENU_CLOSE_DELAY_MS, NOTICE_DISPLAY_MS,
    REVEAL_STAGGER_MS, REVEAL_THRESHOLD, ROTATE_INTERVAL_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Navigation dropdown timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Delay (ms) between the pointer leaving trigger, panel or sub-panel and
    /// the menu closing.
    pub close_delay_ms: u64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: MENU_CLOSE_DELAY_MS,
        }
    }
}

impl MenuConfig {
    /// Close delay as a [`Duration`]
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

/// Auto-advance settings shared by the hero and testimonial carousels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Time (ms) each slide stays on screen while auto-advancing.
    pub interval_ms: u64,
    /// Start auto-advancing as soon as the carousel mounts.
    pub autoplay: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: ROTATE_INTERVAL_MS,
            autoplay: true,
        }
    }
}

impl CarouselConfig {
    /// Slide interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Toast lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// How long (ms) a toast stays visible.
    pub display_ms: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            display_ms: NOTICE_DISPLAY_MS,
        }
    }
}

impl NoticeConfig {
    /// Display time as a [`Duration`]
    pub fn display_for(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

/// Contact form submission timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactConfig {
    /// How long (ms) a submission stays in the sending state before it
    /// completes.
    pub submit_delay_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: CONTACT_SUBMIT_DELAY_MS,
        }
    }
}

impl ContactConfig {
    /// Submit delay as a [`Duration`]
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

/// Scroll-triggered reveal thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Visible fraction of a section, in `(0, 1]`, that triggers its reveal.
    pub threshold: f32,
    /// Sections stop observing visibility after their first reveal.
    pub trigger_once: bool,
    /// Delay (ms) between consecutive children of a revealing section.
    pub stagger_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: REVEAL_THRESHOLD,
            trigger_once: true,
            stagger_ms: REVEAL_STAGGER_MS,
        }
    }
}

impl RevealConfig {
    /// Child stagger as a [`Duration`]
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

/// Header styling.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Scroll offset (px) past which the header turns solid.
    pub scrolled_threshold_px: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: HEADER_SCROLLED_THRESHOLD_PX,
        }
    }
}
