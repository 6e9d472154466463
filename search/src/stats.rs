//! Counters accumulated over one classification.

use serde::Serialize;

/// Running summary of branch angles (radians) on pushed permutations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AngleSummary {
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
}

impl AngleSummary {
    pub fn record(&mut self, angle: f64) {
        self.count += 1;
        self.sum += angle;
        self.min = Some(self.min.map_or(angle, |m| m.min(angle)));
        self.max = Some(self.max.map_or(angle, |m| m.max(angle)));
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Search-wide counters, shared by nested take-best searches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    pub expansions: u64,
    pub permutations_enumerated: u64,
    pub permutations_rejected: u64,
    pub permutation_caps_hit: u64,
    pub states_enqueued: u64,
    pub states_pruned: u64,
    /// Complete trees that failed the validity check.
    pub trees_discarded: u64,
    pub take_best_commits: u64,
    /// Nested take-best searches that ended without a valid subtree.
    pub subtree_fallbacks: u64,
    pub frontier_high_water: u64,
    pub angles: AngleSummary,
}
