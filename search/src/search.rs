//! Search entry point and expansion loop.
//!
//! One best-first search runs per call to [`search`]. A node whose label is
//! flagged `take_best` commits to its cheapest permutation and resolves each
//! newly labeled child with a nested search on the same call stack before the
//! outer loop continues. Nested searches share the expansion budget, the
//! sequence counter and the statistics of the outer one.

use serde::Serialize;

use airway_kernel::taxonomy::Taxonomy;
use airway_kernel::tree::{LabeledTree, NodeIx};
use airway_kernel::validity::{check_subtree, Violation};

use crate::frontier::BestFirstFrontier;
use crate::permutation::{self, Permutation};
use crate::policy::SearchPolicy;
use crate::state::SearchState;
use crate::stats::SearchStats;

/// Why a search (or nested take-best search) stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// A complete labeling passed the validity check.
    ValidTreeFound,
    /// Every state was expanded or discarded without a valid labeling.
    FrontierExhausted,
    /// `max_expansions` was reached.
    ExpansionBudgetExceeded,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidTreeFound => f.write_str("valid tree found"),
            Self::FrontierExhausted => f.write_str("frontier exhausted"),
            Self::ExpansionBudgetExceeded => f.write_str("expansion budget exceeded"),
        }
    }
}

/// One worklist expansion, recorded when `policy.record_trace` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandEvent {
    pub expansion_order: u64,
    /// Nesting level: 0 for the outer search, +1 per take-best descent.
    pub nesting: u32,
    pub node_id: String,
    pub label: String,
    pub frontier_cost: f64,
    pub permutations: u64,
    pub states_pushed: u64,
    pub take_best: bool,
}

/// Result of a search execution. Always carries a tree.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub tree: LabeledTree,
    pub cost: f64,
    pub termination: TerminationReason,
    /// Why the returned tree is invalid, if it is.
    pub violation: Option<Violation>,
    pub stats: SearchStats,
    pub trace: Vec<ExpandEvent>,
}

impl SearchResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.termination == TerminationReason::ValidTreeFound
    }
}

/// Run the best-first search from the tree's root.
///
/// The root must already carry its taxonomy label; see
/// [`crate::select::classify`] for the checked entry point.
#[must_use]
pub fn search(taxonomy: &Taxonomy, tree: LabeledTree, policy: &SearchPolicy) -> SearchResult {
    let mut searcher = Searcher {
        taxonomy,
        policy,
        next_seq: 0,
        stats: SearchStats::default(),
        trace: Vec::new(),
    };
    let root = tree.root();
    let outcome = searcher.run(tree, root, 0.0, 0);
    SearchResult {
        tree: outcome.tree,
        cost: outcome.cost,
        termination: outcome.termination,
        violation: outcome.violation,
        stats: searcher.stats,
        trace: searcher.trace,
    }
}

struct Outcome {
    tree: LabeledTree,
    cost: f64,
    termination: TerminationReason,
    violation: Option<Violation>,
}

struct Searcher<'a> {
    taxonomy: &'a Taxonomy,
    policy: &'a SearchPolicy,
    next_seq: u64,
    stats: SearchStats,
    trace: Vec<ExpandEvent>,
}

impl Searcher<'_> {
    fn state(&mut self, cost: f64, tree: LabeledTree, pending: Vec<NodeIx>) -> SearchState {
        let seq = self.next_seq;
        self.next_seq += 1;
        SearchState {
            cost,
            seq,
            tree,
            pending,
        }
    }

    fn push(&mut self, frontier: &mut BestFirstFrontier, state: SearchState) {
        self.stats.states_enqueued += 1;
        frontier.push(state);
        self.stats.frontier_high_water = self.stats.frontier_high_water.max(frontier.high_water());
    }

    /// Search the subtree below `start` until a valid labeling of it pops.
    fn run(&mut self, tree: LabeledTree, start: NodeIx, start_cost: f64, nesting: u32) -> Outcome {
        let mut frontier = BestFirstFrontier::new();
        let seed_tree = tree.clone();
        let seed = self.state(start_cost, tree, vec![start]);
        let mut first_discard: Option<(SearchState, Violation)> = None;
        self.push(&mut frontier, seed);

        let termination = loop {
            if self.stats.expansions >= self.policy.max_expansions {
                break TerminationReason::ExpansionBudgetExceeded;
            }
            let Some(mut current) = frontier.pop() else {
                break TerminationReason::FrontierExhausted;
            };

            if current.is_complete() {
                match check_subtree(&current.tree, self.taxonomy, start) {
                    Ok(()) => {
                        return Outcome {
                            tree: current.tree,
                            cost: current.cost,
                            termination: TerminationReason::ValidTreeFound,
                            violation: None,
                        };
                    }
                    Err(violation) => {
                        log::trace!("discarding complete tree at cost {}: {violation}", current.cost);
                        self.stats.trees_discarded += 1;
                        if first_discard.is_none() {
                            first_discard = Some((current, violation));
                        }
                        continue;
                    }
                }
            }

            let node = current.pending.remove(0);
            self.stats.expansions += 1;
            self.expand(&mut frontier, current, node, nesting);
            self.stats.states_pruned += frontier.prune_to(self.policy.max_frontier_size) as u64;
        };

        // Complete states pop in cost order, so the first discard is the
        // cheapest complete tree seen.
        if let Some((state, violation)) = first_discard {
            return Outcome {
                tree: state.tree,
                cost: state.cost,
                termination,
                violation: Some(violation),
            };
        }
        let (tree, cost) = match frontier.pop() {
            Some(state) => (state.tree, state.cost),
            None => (seed_tree, start_cost),
        };
        let violation = check_subtree(&tree, self.taxonomy, start).err();
        Outcome {
            tree,
            cost,
            termination,
            violation,
        }
    }

    fn expand(
        &mut self,
        frontier: &mut BestFirstFrontier,
        state: SearchState,
        node: NodeIx,
        nesting: u32,
    ) {
        let taxonomy = self.taxonomy;
        let SearchState {
            cost,
            tree,
            pending: rest,
            ..
        } = state;

        let Some(entry) = taxonomy.get(tree.label(node)) else {
            log::debug!(
                "node {} is labeled {:?}, which has no taxonomy entry; not classifying below it",
                tree.node_id(node),
                tree.label(node)
            );
            self.record(nesting, &tree, node, cost, 0, 1, false);
            let next = self.state(cost, tree, rest);
            self.push(frontier, next);
            return;
        };
        let take_best = entry.take_best;

        let set = permutation::enumerate(taxonomy, &tree, node, self.policy);
        self.stats.permutations_enumerated += set.enumerated;
        self.stats.permutations_rejected += set.rejected;
        self.stats.permutation_caps_hit += u64::from(set.capped);
        let found = set.permutations.len() as u64;

        let Some(best) = set.permutations.first() else {
            log::debug!(
                "no legal permutation for the successors of node {} ({})",
                tree.node_id(node),
                tree.label(node)
            );
            self.record(nesting, &tree, node, cost, 0, 1, take_best);
            let next = self.state(cost, tree, rest);
            self.push(frontier, next);
            return;
        };

        if take_best {
            self.record(nesting, &tree, node, cost, found, 1, true);
            self.stats.take_best_commits += 1;
            self.record_angles(best);
            let (committed, committed_cost) = self.commit(tree, best, cost + best.cost, nesting);
            let next = self.state(committed_cost, committed, rest);
            self.push(frontier, next);
            return;
        }

        self.record(nesting, &tree, node, cost, found, found, false);
        for perm in &set.permutations {
            self.record_angles(perm);
            let mut branch = tree.clone();
            perm.apply_to(&mut branch);
            let mut pending = rest.clone();
            pending.extend(perm.labeled_nodes(taxonomy));
            let next = self.state(cost + perm.cost, branch, pending);
            self.push(frontier, next);
        }
    }

    /// Apply `perm` and resolve each newly labeled child with a nested search.
    fn commit(
        &mut self,
        mut tree: LabeledTree,
        perm: &Permutation,
        mut cost: f64,
        nesting: u32,
    ) -> (LabeledTree, f64) {
        perm.apply_to(&mut tree);
        let children: Vec<NodeIx> = perm.labeled_nodes(self.taxonomy).collect();
        for child in children {
            let outcome = self.run(tree, child, cost, nesting + 1);
            if outcome.termination != TerminationReason::ValidTreeFound {
                self.stats.subtree_fallbacks += 1;
                log::debug!(
                    "no valid labeling below node {} ({}); keeping the cheapest candidate",
                    outcome.tree.node_id(child),
                    outcome.termination
                );
            }
            tree = outcome.tree;
            cost = outcome.cost;
        }
        (tree, cost)
    }

    fn record_angles(&mut self, perm: &Permutation) {
        for angle in perm.assignments.iter().filter_map(|a| a.angle) {
            self.stats.angles.record(angle);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        nesting: u32,
        tree: &LabeledTree,
        node: NodeIx,
        frontier_cost: f64,
        permutations: u64,
        states_pushed: u64,
        take_best: bool,
    ) {
        if !self.policy.record_trace {
            return;
        }
        self.trace.push(ExpandEvent {
            expansion_order: self.stats.expansions - 1,
            nesting,
            node_id: tree.node_id(node).to_string(),
            label: tree.label(node).to_string(),
            frontier_cost,
            permutations,
            states_pushed,
            take_best,
        });
    }
}
