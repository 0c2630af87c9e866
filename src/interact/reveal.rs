//! One-shot reveal tracking for scrollable content.
//!
//! Targets register with their vertical extent; each sweep compares the
//! visible fraction of every still-hidden target against a threshold and
//! marks those that cross it as revealed. Revelation is permanent within a
//! session: scrolling a target back out never hides it again, mirroring an
//! observer that unsubscribes after the first intersection.
//!
//! The bottom margin shrinks the effective viewport from below, so targets
//! only count as seen once they have cleared the fold by that much.

use std::collections::HashSet;

#[derive(Debug, Clone)]
struct RevealTarget {
    id: u64,
    top: u32,
    height: u32,
}

/// Reveal state for one scrollable surface.
#[derive(Debug, Clone)]
pub struct RevealEngine {
    threshold: f64,
    bottom_margin: u32,
    targets: Vec<RevealTarget>,
    revealed: HashSet<u64>,
}

impl RevealEngine {
    /// `threshold` is the visible fraction, in `[0, 1]`, a target must reach.
    #[must_use]
    pub fn new(threshold: f64, bottom_margin: u32) -> Self {
        Self {
            threshold,
            bottom_margin,
            targets: Vec::new(),
            revealed: HashSet::new(),
        }
    }

    /// Register a target spanning `height` rows from `top`. Zero-height
    /// targets are treated as one row tall.
    pub fn observe(&mut self, id: u64, top: u32, height: u32) {
        self.targets.push(RevealTarget { id, top, height });
    }

    /// Evaluate every still-hidden target against the viewport starting at
    /// `viewport_top`. Returns the ids newly revealed by this sweep, in
    /// registration order.
    pub fn sweep(&mut self, viewport_top: u32, viewport_height: u32) -> Vec<u64> {
        let view_top = f64::from(viewport_top);
        let view_bottom =
            view_top + f64::from(viewport_height.saturating_sub(self.bottom_margin));

        let mut fresh = Vec::new();
        for target in &self.targets {
            if self.revealed.contains(&target.id) {
                continue;
            }
            let height = f64::from(target.height.max(1));
            let top = f64::from(target.top);
            let overlap = (top + height).min(view_bottom) - top.max(view_top);
            if overlap > 0.0 && overlap / height >= self.threshold {
                fresh.push(target.id);
            }
        }
        for &id in &fresh {
            self.revealed.insert(id);
        }
        fresh
    }

    #[must_use]
    pub fn is_revealed(&self, id: u64) -> bool {
        self.revealed.contains(&id)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Forget every registration and revelation.
    pub fn clear(&mut self) {
        self.targets.clear();
        self.revealed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_reveals_once_enough_of_it_is_visible() {
        let mut engine = RevealEngine::new(0.1, 0);
        engine.observe(1, 100, 20);

        // Viewport ends at row 101: one of twenty rows visible, 5%.
        assert!(engine.sweep(0, 101).is_empty());
        // Viewport ends at row 102: two rows visible, exactly 10%.
        assert_eq!(engine.sweep(0, 102), vec![1]);
    }

    #[test]
    fn bottom_margin_delays_revelation() {
        let mut engine = RevealEngine::new(0.1, 50);
        engine.observe(1, 100, 10);

        // Without the margin rows 100..103 would already show 30%.
        assert!(engine.sweep(0, 103).is_empty());
        // The target must clear the shrunken fold instead.
        assert_eq!(engine.sweep(0, 151), vec![1]);
    }

    #[test]
    fn revelation_is_permanent() {
        let mut engine = RevealEngine::new(0.1, 0);
        engine.observe(1, 100, 10);

        assert_eq!(engine.sweep(50, 80), vec![1]);
        // Scrolled far away; the target stays revealed and is not re-reported.
        assert!(engine.sweep(500, 80).is_empty());
        assert!(engine.is_revealed(1));
    }

    #[test]
    fn sweep_reports_only_fresh_targets_in_registration_order() {
        let mut engine = RevealEngine::new(0.5, 0);
        engine.observe(1, 0, 10);
        engine.observe(2, 40, 10);
        engine.observe(3, 500, 10);

        assert_eq!(engine.sweep(0, 60), vec![1, 2]);
        assert_eq!(engine.sweep(480, 60), vec![3]);
        assert_eq!(engine.revealed_count(), 3);
    }

    #[test]
    fn half_threshold_requires_half_the_target() {
        let mut engine = RevealEngine::new(0.5, 0);
        engine.observe(7, 90, 10);

        assert!(engine.sweep(0, 94).is_empty());
        assert_eq!(engine.sweep(0, 95), vec![7]);
    }

    #[test]
    fn zero_height_target_counts_as_one_row() {
        let mut engine = RevealEngine::new(0.1, 0);
        engine.observe(1, 30, 0);

        assert!(engine.sweep(0, 30).is_empty());
        assert_eq!(engine.sweep(0, 31), vec![1]);
    }

    #[test]
    fn viewport_swallowed_by_margin_reveals_nothing() {
        let mut engine = RevealEngine::new(0.1, 50);
        engine.observe(1, 0, 10);

        assert!(engine.sweep(0, 40).is_empty());
    }

    #[test]
    fn clear_resets_targets_and_revelations() {
        let mut engine = RevealEngine::new(0.1, 0);
        engine.observe(1, 0, 10);
        engine.sweep(0, 100);
        engine.clear();

        assert_eq!(engine.revealed_count(), 0);
        assert_eq!(engine.target_count(), 0);
        assert!(!engine.is_revealed(1));
    }
}
