//! Scroll-triggered section reveals
//!
//! Sections fade in once enough of them is inside the viewport and stay
//! revealed from then on. Visibility is tracked separately: a `trigger_once`
//! section stops observing after its first reveal, other sections keep
//! reporting whether they are in view.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{REVEAL_STAGGER_MS, REVEAL_THRESHOLD};
use crate::error::{InteractionError, Result};

/// Vertical extent in document pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the top edge.
    pub top: f32,
    /// Height; `new` clamps negatives to zero.
    pub height: f32,
}

impl Span {
    /// Span starting at `top`.
    pub fn new(top: f32, height: f32) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    /// Offset of the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Fraction of `bounds` that lies inside `viewport`, in `[0, 1]`.
///
/// A zero-height element counts as fully visible while its top edge is
/// inside the viewport.
pub fn intersection_ratio(bounds: Span, viewport: Span) -> f32 {
    if bounds.height <= 0.0 {
        let inside =
            bounds.top >= viewport.top && bounds.top <= viewport.bottom();
        return if inside { 1.0 } else { 0.0 };
    }
    let overlap = (bounds.bottom().min(viewport.bottom())
        - bounds.top.max(viewport.top))
    .max(0.0);
    (overlap / bounds.height).clamp(0.0, 1.0)
}

/// A section whose revealed or in-view state changed on a viewport update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealChange<K> {
    /// Section that changed.
    pub key: K,
    /// Latched: once true it never goes back to false.
    pub revealed: bool,
    /// Whether the section currently meets the threshold.
    pub in_view: bool,
}

#[derive(Debug, Clone)]
struct Section {
    bounds: Span,
    trigger_once: bool,
    revealed: bool,
    in_view: bool,
}

impl Section {
    fn observing(&self) -> bool {
        !(self.trigger_once && self.revealed)
    }
}

/// Tracks which page sections have scrolled into view.
#[derive(Debug)]
pub struct RevealTracker<K>
where
    K: Clone + Eq + Hash + Debug,
{
    sections: HashMap<K, Section>,
    threshold: f32,
    stagger: Duration,
    viewport: Option<Span>,
}

impl<K> Default for RevealTracker<K>
where
    K: Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self {
            sections: HashMap::new(),
            threshold: REVEAL_THRESHOLD,
            stagger: Duration::from_millis(REVEAL_STAGGER_MS),
            viewport: None,
        }
    }
}

impl<K> RevealTracker<K>
where
    K: Clone + Eq + Hash + Debug,
{
    /// `threshold` must lie in `(0, 1]`.
    pub fn new(threshold: f32, stagger: Duration) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(InteractionError::InvalidConfiguration(format!(
                "reveal threshold {threshold} outside (0, 1]"
            )));
        }
        Ok(Self {
            threshold,
            stagger,
            ..Self::default()
        })
    }

    /// Track a section. Its state is evaluated against the last viewport on
    /// the next [`Self::update_viewport`].
    pub fn register(&mut self, key: K, bounds: Span, trigger_once: bool) {
        self.sections.insert(
            key,
            Section {
                bounds,
                trigger_once,
                revealed: false,
                in_view: false,
            },
        );
    }

    /// Layout moved a section
    pub fn update_bounds(&mut self, key: &K, bounds: Span) -> bool {
        match self.sections.get_mut(key) {
            Some(section) => {
                section.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Stop tracking a section. Returns whether it was registered.
    pub fn unregister(&mut self, key: &K) -> bool {
        self.sections.remove(key).is_some()
    }

    /// Re-evaluate every section against `viewport`, returning the sections
    /// whose revealed or in-view state changed.
    ///
    /// A revealed section never hides again. `trigger_once` sections stop
    /// observing after the reveal, so their in-view flag stays frozen.
    pub fn update_viewport(&mut self, viewport: Span) -> Vec<RevealChange<K>> {
        self.viewport = Some(viewport);
        let threshold = self.threshold;

        let mut changes = Vec::new();
        for (key, section) in self.sections.iter_mut() {
            if !section.observing() {
                continue;
            }
            let ratio = intersection_ratio(section.bounds, viewport);
            let in_view = ratio > 0.0 && ratio >= threshold;
            let revealed = section.revealed || in_view;

            if revealed != section.revealed || in_view != section.in_view {
                trace!(?key, ratio, revealed, in_view, "reveal state changed");
                section.revealed = revealed;
                section.in_view = in_view;
                changes.push(RevealChange {
                    key: key.clone(),
                    revealed,
                    in_view,
                });
            }
        }
        changes
    }

    /// Whether the section has ever met the threshold.
    pub fn is_revealed(&self, key: &K) -> bool {
        self.sections
            .get(key)
            .is_some_and(|section| section.revealed)
    }

    /// Whether the section met the threshold on the last observed viewport.
    pub fn is_in_view(&self, key: &K) -> bool {
        self.sections.get(key).is_some_and(|section| section.in_view)
    }

    /// Last viewport passed to `update_viewport`.
    pub fn viewport(&self) -> Option<Span> {
        self.viewport
    }

    /// Visible fraction needed to reveal a section.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Delay before child `child_index` of a revealing section animates in.
    pub fn stagger_delay(&self, child_index: usize) -> Duration {
        self.stagger.saturating_mul(child_index as u32)
    }

    /// Number of registered sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when no section is registered.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_partial_overlap() {
        let viewport = Span::new(0.0, 800.0);
        assert_eq!(intersection_ratio(Span::new(700.0, 200.0), viewport), 0.5);
        assert_eq!(intersection_ratio(Span::new(900.0, 200.0), viewport), 0.0);
        assert_eq!(intersection_ratio(Span::new(100.0, 200.0), viewport), 1.0);
        assert_eq!(intersection_ratio(Span::new(400.0, 0.0), viewport), 1.0);
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        assert!(RevealTracker::<&str>::new(0.0, Duration::ZERO).is_err());
        assert!(RevealTracker::<&str>::new(1.5, Duration::ZERO).is_err());
        assert!(RevealTracker::<&str>::new(1.0, Duration::ZERO).is_ok());
    }

    #[test]
    fn trigger_once_sections_latch() {
        let mut tracker = RevealTracker::default();
        tracker.register("about", Span::new(1_000.0, 500.0), true);

        assert!(tracker.update_viewport(Span::new(0.0, 800.0)).is_empty());

        // 60px of 500px is above the 10% threshold.
        let changes = tracker.update_viewport(Span::new(260.0, 800.0));
        assert_eq!(
            changes,
            vec![RevealChange {
                key: "about",
                revealed: true,
                in_view: true,
            }]
        );

        assert!(tracker.update_viewport(Span::new(0.0, 800.0)).is_empty());
        assert!(tracker.is_revealed(&"about"));
    }

    #[test]
    fn below_threshold_stays_hidden() {
        let mut tracker = RevealTracker::default();
        tracker.register("cta", Span::new(790.0, 500.0), true);

        // 10px of 500px is 2%.
        tracker.update_viewport(Span::new(0.0, 800.0));
        assert!(!tracker.is_revealed(&"cta"));
    }

    #[test]
    fn reveal_latches_for_observed_sections() {
        let mut tracker = RevealTracker::default();
        tracker.register("step-1", Span::new(0.0, 400.0), false);

        tracker.update_viewport(Span::new(0.0, 800.0));
        assert!(tracker.is_revealed(&"step-1"));

        let changes = tracker.update_viewport(Span::new(2_000.0, 800.0));
        assert_eq!(
            changes,
            vec![RevealChange {
                key: "step-1",
                revealed: true,
                in_view: false,
            }]
        );
        assert!(tracker.is_revealed(&"step-1"));
        assert!(!tracker.is_in_view(&"step-1"));

        let changes = tracker.update_viewport(Span::new(0.0, 800.0));
        assert_eq!(changes.len(), 1);
        assert!(changes[0].in_view);
    }

    #[test]
    fn trigger_once_sections_stop_observing() {
        let mut tracker = RevealTracker::default();
        tracker.register("cta", Span::new(0.0, 400.0), true);

        tracker.update_viewport(Span::new(0.0, 800.0));
        assert!(tracker.update_viewport(Span::new(2_000.0, 800.0)).is_empty());
        assert!(tracker.is_revealed(&"cta"));
        assert!(tracker.is_in_view(&"cta"));
    }

    #[test]
    fn stagger_grows_per_child() {
        let tracker = RevealTracker::<&str>::default();
        assert_eq!(tracker.stagger_delay(0), Duration::ZERO);
        assert_eq!(tracker.stagger_delay(3), Duration::from_millis(600));
    }
}
