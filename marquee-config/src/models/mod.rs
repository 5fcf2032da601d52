//! Configuration model and loaders.

mod sections;
mod source;

pub use sections::{
    CarouselConfig, ContactConfig, HeaderConfig, MenuConfig, NoticeConfig,
    RevealConfig,
};
pub use source::InteractionConfigSource;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::util::parse_bool_var;

/// Timings and thresholds for every interaction primitive on the site.
///
/// Missing sections and fields fall back to the defaults in
/// [`marquee_core::constants`], so an empty file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Navigation dropdowns: how long the menu waits after the pointer leaves
    /// before it closes. Shorter delays make the menu feel twitchy when the
    /// pointer crosses the gap between trigger and panel.
    pub menu: MenuConfig,
    /// Hero carousel at the top of the landing page.
    pub hero: CarouselConfig,
    /// Client testimonial carousel.
    pub testimonials: CarouselConfig,
    /// Toast shown after the contact form submits.
    pub notice: NoticeConfig,
    /// Contact form send delay.
    pub contact: ContactConfig,
    /// Scroll-triggered section reveals.
    pub reveal: RevealConfig,
    /// Header scroll styling.
    pub header: HeaderConfig,
}

impl InteractionConfig {
    /// Load interaction configuration using environment variables.
    /// Evaluation order:
    /// 1) `$MARQUEE_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$MARQUEE_CONFIG_JSON` (inline JSON),
    /// 3) the first default candidate file that exists,
    /// 4) defaults.
    ///
    /// `$MARQUEE_AUTOPLAY` then overrides `autoplay` on both carousels,
    /// whichever source was used.
    pub fn load_from_env() -> anyhow::Result<(Self, InteractionConfigSource)> {
        let (mut config, source) = Self::load_base_from_env()?;
        if let Some(autoplay) = parse_bool_var("MARQUEE_AUTOPLAY") {
            tracing::debug!(autoplay, "MARQUEE_AUTOPLAY override");
            config.hero.autoplay = autoplay;
            config.testimonials.autoplay = autoplay;
        }
        Ok((config, source))
    }

    fn load_base_from_env() -> anyhow::Result<(Self, InteractionConfigSource)> {
        if let Ok(path_str) = env::var("MARQUEE_CONFIG_PATH")
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, InteractionConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var("MARQUEE_CONFIG_JSON")
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .context("failed to parse MARQUEE_CONFIG_JSON")?;
            return Ok((parsed, InteractionConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, InteractionConfigSource::File(path)));
        }

        Ok((Self::default(), InteractionConfigSource::Default))
    }

    /// Load a config file. `.json` is parsed as JSON, `.toml`/`.tml` as TOML,
    /// anything else tries both.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read interaction config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid interaction config {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!(
                        "invalid interaction config {}: {}",
                        path.display(),
                        err
                    )
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    /// Parse TOML, falling back to JSON. `origin` names the source in errors.
    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse interaction config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    /// Parse an inline JSON document.
    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid interaction config json: {err}"))
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "marquee.toml",
            "marquee.json",
            "config/marquee.toml",
            "config/marquee.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_document_yields_defaults() {
        let config = InteractionConfig::parse_from_str("", "inline").unwrap();
        assert_eq!(config, InteractionConfig::default());
        assert_eq!(config.menu.close_delay(), Duration::from_millis(300));
        assert_eq!(config.hero.interval(), Duration::from_secs(5));
        assert!(config.reveal.trigger_once);
        assert_eq!(config.contact.submit_delay(), Duration::from_millis(1_500));
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let raw = r#"
            [testimonials]
            interval_ms = 8000

            [reveal]
            threshold = 0.25
        "#;
        let config = InteractionConfig::parse_from_str(raw, "inline").unwrap();

        assert_eq!(config.testimonials.interval_ms, 8_000);
        assert!(config.testimonials.autoplay);
        assert_eq!(config.hero.interval_ms, 5_000);
        assert_eq!(config.reveal.threshold, 0.25);
        assert_eq!(config.reveal.stagger_ms, 200);
    }

    #[test]
    fn json_is_accepted_when_toml_fails() {
        let raw = r#"{ "menu": { "close_delay_ms": 450 } }"#;
        let config = InteractionConfig::parse_from_str(raw, "inline").unwrap();
        assert_eq!(config.menu.close_delay_ms, 450);
    }

    #[test]
    fn garbage_reports_both_parsers() {
        let err = InteractionConfig::parse_from_str("menu = [", "inline")
            .unwrap_err()
            .to_string();
        assert!(err.contains("toml error"));
        assert!(err.contains("json error"));
    }
}
