//! Search policy: budgets and behaviour switches.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// When a permutation's angular cost is comparable across permutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorRule {
    /// Every assigned label must have a reference vector.
    All,
    /// At least one assigned label must have a reference vector; labels
    /// without one contribute no cost.
    Any,
}

impl std::str::FromStr for VectorRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "any" => Ok(Self::Any),
            other => Err(format!("unknown vector rule {other:?} (expected \"all\" or \"any\")")),
        }
    }
}

impl std::fmt::Display for VectorRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Any => f.write_str("any"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPolicy {
    /// Hard cap on worklist expansions, shared with nested take-best searches.
    pub max_expansions: u64,
    /// Frontier prune threshold; pruning keeps the cheapest states.
    pub max_frontier_size: usize,
    /// Distinct permutations enumerated per node before enumeration stops.
    pub max_permutations_per_node: u64,
    pub vector_rule: VectorRule,
    /// Record one [`crate::search::ExpandEvent`] per expansion.
    pub record_trace: bool,
}

impl SearchPolicy {
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if any budget is zero.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_expansions == 0 {
            return Err(SearchError::InvalidPolicy {
                detail: "max_expansions must be at least 1".into(),
            });
        }
        if self.max_frontier_size == 0 {
            return Err(SearchError::InvalidPolicy {
                detail: "max_frontier_size must be at least 1".into(),
            });
        }
        if self.max_permutations_per_node == 0 {
            return Err(SearchError::InvalidPolicy {
                detail: "max_permutations_per_node must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_expansions: 250_000,
            max_frontier_size: 100_000,
            max_permutations_per_node: 1_000_000,
            vector_rule: VectorRule::All,
            record_trace: false,
        }
    }
}
