//! Replay script model.

use std::{fs, path::Path};

use anyhow::{Context, anyhow};
use marquee_core::{MenuMessage, NoticeTone, RotatorMessage};
use serde::Deserialize;

/// Event script, as read from TOML or JSON.
///
/// ```toml
/// hero_slides = 3
///
/// [[sections]]
/// key = "services"
/// top = 900.0
/// height = 600.0
///
/// [[events]]
/// at_ms = 0
/// menu = { action = "pointer_enter", id = "services" }
///
/// [[events]]
/// at_ms = 120
/// menu = { action = "pointer_leave" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Slides in the hero carousel.
    #[serde(default = "default_slides")]
    pub hero_slides: usize,
    /// Cards in the testimonial carousel.
    #[serde(default = "default_slides")]
    pub testimonials: usize,
    /// Sections registered with the reveal tracker before the first event.
    #[serde(default)]
    pub sections: Vec<ScriptSection>,
    /// Events, in any order.
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

// The landing page ships three hero slides and three testimonials.
fn default_slides() -> usize {
    3
}

/// Page section observed for reveals, in page pixels.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptSection {
    /// Name used in output lines.
    pub key: String,
    /// Offset of the top edge.
    pub top: f32,
    /// Height of the section.
    pub height: f32,
}

/// One timestamped event.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEvent {
    /// Virtual milliseconds since the start of the run.
    pub at_ms: u64,
    /// What happens, keyed by the controller it addresses.
    #[serde(flatten)]
    pub command: Command,
}

/// Event body. The key names the controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Header dropdowns and mobile accordion
    Menu(MenuMessage<String>),
    /// Hero carousel
    Hero(RotatorMessage),
    /// Testimonial carousel
    Testimonials(RotatorMessage),
    /// Contact toast, driven directly
    Notice(NoticeAction),
    /// Contact form
    Contact(ContactAction),
    /// Header scroll style and drawer
    Header(HeaderAction),
    /// Reveal tracker
    Reveal(RevealAction),
}

impl Command {
    /// Controller name printed in output lines. Menu events report as
    /// `header`, since the header owns the menu.
    pub fn target(&self) -> &'static str {
        match self {
            Self::Menu(_) | Self::Header(_) => "header",
            Self::Hero(_) => "hero",
            Self::Testimonials(_) => "testimonials",
            Self::Notice(_) => "notice",
            Self::Contact(_) => "contact",
            Self::Reveal(_) => "reveal",
        }
    }
}

/// Toast events.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NoticeAction {
    /// Show a notice
    Show {
        /// Text of the notice.
        message: String,
        /// Success or error styling.
        tone: NoticeTone,
    },
    /// Close button
    Dismiss,
    /// Toast unmounted
    Dispose,
}

/// Contact form events.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ContactAction {
    /// Submit button pressed
    Submit,
    /// The in-flight send failed
    Fail,
    /// Contact section unmounted
    Dispose,
}

/// Header events that do not go through the menu.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HeaderAction {
    /// Page scrolled
    Scroll {
        /// Vertical scroll offset in pixels.
        offset_y: f32,
    },
    /// Hamburger button
    ToggleMobile,
    /// Accordion heading tapped in the drawer
    ToggleSection {
        /// Menu id of the section.
        id: String,
    },
    /// Header unmounted
    Dispose,
}

/// Reveal tracker events.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RevealAction {
    /// Viewport moved or resized
    Viewport {
        /// Scroll offset of the viewport top.
        top: f32,
        /// Viewport height.
        height: f32,
    },
}

impl Script {
    /// Reads a script. `.json` files parse as JSON, everything else as TOML.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read script {}", path.display())
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).map_err(|err| {
                anyhow!("invalid script {}: {}", path.display(), err)
            }),
            _ => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid script {}: {}", path.display(), err)
            }),
        }
    }

    /// Events in the order they will be applied. Events sharing a timestamp
    /// keep their script order.
    pub fn ordered_events(&self) -> Vec<&ScriptEvent> {
        let mut events: Vec<_> = self.events.iter().collect();
        events.sort_by_key(|event| event.at_ms);
        events
    }

    /// Timestamp of the latest event, or 0 for an empty script.
    pub fn last_event_ms(&self) -> u64 {
        self.events.iter().map(|e| e.at_ms).max().unwrap_or(0)
    }
}
