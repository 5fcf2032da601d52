//! Builds the site's interaction primitives from an [`InteractionConfig`].

use anyhow::Context;
use marquee_core::{
    ContactSnapshot, ContactSubmission, HeaderSnapshot, HoverIntentMenu,
    Notice, RevealTracker, RotatorSnapshot, SharedClock, SiteHeader, Span,
    TimedNotice, TimedRotator, TimerDriven,
};

use crate::models::InteractionConfig;
use crate::validation::apply_guard_rails;

/// Every timer-owning primitive one page needs, wired with the configured
/// timings and sharing one clock.
#[derive(Debug)]
pub struct SiteControllers {
    /// Navigation bar with its dropdowns and mobile drawer
    pub header: SiteHeader<String>,
    /// Hero carousel
    pub hero: TimedRotator,
    /// Testimonial carousel
    pub testimonials: TimedRotator,
    /// Contact form, owning the outcome toast
    pub contact: ContactSubmission,
    /// Section reveals
    pub reveal: RevealTracker<String>,
    reveal_trigger_once: bool,
}

impl SiteControllers {
    /// Validate `config` and build the controllers. Carousels with
    /// `autoplay` enabled are started immediately.
    pub fn build(
        config: &InteractionConfig,
        clock: SharedClock,
        hero_slides: usize,
        testimonials: usize,
    ) -> anyhow::Result<Self> {
        let warnings = apply_guard_rails(config)?;
        for warning in &warnings.items {
            match &warning.hint {
                Some(hint) => tracing::warn!(hint = %hint, "{}", warning.message),
                None => tracing::warn!("{}", warning.message),
            }
        }

        let menu = HoverIntentMenu::new(clock.clone(), config.menu.close_delay())?;
        let header = SiteHeader::new(menu, config.header.scrolled_threshold_px);

        let mut hero = TimedRotator::new(hero_slides, clock.clone())
            .context("hero carousel")?;
        if config.hero.autoplay {
            hero.start(config.hero.interval())?;
        }

        let mut testimonial_rotator = TimedRotator::new(testimonials, clock.clone())
            .context("testimonial carousel")?;
        if config.testimonials.autoplay {
            testimonial_rotator.start(config.testimonials.interval())?;
        }

        let notice = TimedNotice::new(clock.clone(), config.notice.display_for())?;
        let contact =
            ContactSubmission::new(clock, notice, config.contact.submit_delay())?;
        let reveal =
            RevealTracker::new(config.reveal.threshold, config.reveal.stagger())?;

        tracing::debug!(hero_slides, testimonials, "site controllers built");
        Ok(Self {
            header,
            hero,
            testimonials: testimonial_rotator,
            contact,
            reveal,
            reveal_trigger_once: config.reveal.trigger_once,
        })
    }

    /// Track a page section using the configured `trigger_once` policy.
    pub fn register_section(&mut self, key: impl Into<String>, bounds: Span) {
        self.reveal
            .register(key.into(), bounds, self.reveal_trigger_once);
    }

    /// The timer-owning controllers, for [`marquee_core::drive_until`] or a
    /// host poll loop.
    pub fn timers(&mut self) -> [&mut dyn TimerDriven; 4] {
        [
            &mut self.header,
            &mut self.hero,
            &mut self.testimonials,
            &mut self.contact,
        ]
    }

    /// Current hero carousel state
    pub fn hero_snapshot(&self) -> RotatorSnapshot {
        self.hero.snapshot()
    }

    /// Current testimonial carousel state
    pub fn testimonials_snapshot(&self) -> RotatorSnapshot {
        self.testimonials.snapshot()
    }

    /// Current header state
    pub fn header_snapshot(&self) -> HeaderSnapshot<String> {
        self.header.snapshot()
    }

    /// Current contact form state
    pub fn contact_snapshot(&self) -> ContactSnapshot {
        self.contact.snapshot()
    }

    /// Toast currently on screen
    pub fn notice_snapshot(&self) -> Option<Notice> {
        self.contact.notice().snapshot()
    }

    /// Page unmount. Already-disposed controllers are skipped. Returns how
    /// many controllers this call disposed.
    pub fn dispose(&mut self) -> usize {
        let mut disposed = 0;
        let mut record = |name: &str, result: marquee_core::Result<()>| {
            match result {
                Ok(()) => disposed += 1,
                Err(err) => {
                    tracing::warn!(controller = name, %err, "dispose failed")
                }
            }
        };

        if !self.header.menu().is_disposed() {
            record("header", self.header.dispose());
        }
        if !self.hero.is_disposed() {
            record("hero", self.hero.dispose());
        }
        if !self.testimonials.is_disposed() {
            record("testimonials", self.testimonials.dispose());
        }
        if !self.contact.is_disposed() {
            record("contact", self.contact.dispose());
        }
        disposed
    }
}
