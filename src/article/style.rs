//! Style directives for section drafting
//!
//! One structure template per run, one micro-style per section. The selector is
//! injected so runs are reproducible.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Overall article shapes; one is chosen per run
pub const STRUCTURE_TEMPLATES: [&str; 4] = [
    "problem, then explanation, then practical solution",
    "question-led walkthrough that answers one question per section",
    "myth versus reality, each corrected with evidence",
    "step-by-step guide building from basics to mastery",
];

/// Per-section voice directives, rotated by position
pub const MICRO_STYLES: [&str; 5] = [
    "story hook: open with a short, concrete scene",
    "stat+insight: lead with a number and explain why it matters",
    "direct answer: state the key point in the first sentence",
    "contrarian take: challenge a common assumption, then resolve it",
    "practical checklist: weave actionable steps into the prose",
];

/// Source of style directives for one article run
pub trait StyleSelector: Send + Sync {
    /// Structure template for the run; called once per run
    fn structure_template(&self) -> &'static str;

    /// Micro-style for the section at `position` (0-based)
    fn micro_style(&self, position: usize) -> &'static str {
        MICRO_STYLES[position % MICRO_STYLES.len()]
    }
}

/// Default policy: rotate templates across runs, micro-styles by position
#[derive(Debug, Default)]
pub struct RotatingStyleSelector {
    next_template: AtomicUsize,
}

impl RotatingStyleSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the template rotation at a given offset
    pub fn starting_at(offset: usize) -> Self {
        Self {
            next_template: AtomicUsize::new(offset),
        }
    }
}

impl StyleSelector for RotatingStyleSelector {
    fn structure_template(&self) -> &'static str {
        let idx = self.next_template.fetch_add(1, Ordering::Relaxed);
        STRUCTURE_TEMPLATES[idx % STRUCTURE_TEMPLATES.len()]
    }
}

/// Seeded policy: template drawn from a seeded RNG, micro-styles still rotate
#[derive(Debug, Clone, Copy)]
pub struct SeededStyleSelector {
    seed: u64,
}

impl SeededStyleSelector {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl StyleSelector for SeededStyleSelector {
    fn structure_template(&self) -> &'static str {
        let mut rng = StdRng::seed_from_u64(self.seed);
        STRUCTURE_TEMPLATES[rng.random_range(0..STRUCTURE_TEMPLATES.len())]
    }
}

/// Selector for an optional configured seed
pub fn selector_for(seed: Option<u64>) -> Box<dyn StyleSelector> {
    match seed {
        Some(seed) => Box::new(SeededStyleSelector::new(seed)),
        None => Box::new(RotatingStyleSelector::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micro_styles_rotate_by_position() {
        let selector = RotatingStyleSelector::new();
        assert_eq!(selector.micro_style(0), MICRO_STYLES[0]);
        assert_eq!(selector.micro_style(4), MICRO_STYLES[4]);
        assert_eq!(selector.micro_style(5), MICRO_STYLES[0]);
        assert_eq!(selector.micro_style(7), MICRO_STYLES[2]);
    }

    #[test]
    fn test_rotating_templates() {
        let selector = RotatingStyleSelector::starting_at(3);
        assert_eq!(selector.structure_template(), STRUCTURE_TEMPLATES[3]);
        assert_eq!(selector.structure_template(), STRUCTURE_TEMPLATES[0]);
    }

    #[test]
    fn test_seeded_selector_is_reproducible() {
        let a = SeededStyleSelector::new(42);
        let b = SeededStyleSelector::new(42);
        assert_eq!(a.structure_template(), b.structure_template());
        assert_eq!(a.structure_template(), a.structure_template());
        assert!(STRUCTURE_TEMPLATES.contains(&a.structure_template()));
        assert_eq!(a.micro_style(1), MICRO_STYLES[1]);
    }

    #[test]
    fn test_selector_for() {
        let seeded = selector_for(Some(7));
        assert_eq!(
            seeded.structure_template(),
            SeededStyleSelector::new(7).structure_template()
        );
        let rotating = selector_for(None);
        assert_eq!(rotating.structure_template(), STRUCTURE_TEMPLATES[0]);
    }
}
