//! Search state and frontier ordering key.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use airway_kernel::tree::{LabeledTree, NodeIx};

/// A partially classified tree waiting on the frontier.
///
/// `pending` is the worklist: nodes whose successors still have to be
/// labeled, consumed from the front.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Accumulated permutation cost along the path that built this tree.
    pub cost: f64,
    /// Insertion order, unique per search. Breaks cost ties.
    pub seq: u64,
    pub tree: LabeledTree,
    pub pending: Vec<NodeIx>,
}

impl SearchState {
    /// Whether every node on the worklist has been expanded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// The frontier ordering key: `(cost, seq)`.
///
/// Lower cost first, then older `seq`. Costs compare by IEEE total order so
/// NaN sorts after every finite cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierKey {
    pub cost: OrderedFloat<f64>,
    pub seq: u64,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then(self.seq.cmp(&other.seq))
    }
}

impl From<&SearchState> for FrontierKey {
    fn from(state: &SearchState) -> Self {
        Self {
            cost: OrderedFloat(state.cost),
            seq: state.seq,
        }
    }
}
