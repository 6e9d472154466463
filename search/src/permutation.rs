//! Branch permutation engine.
//!
//! For one node and its immediate successors, enumerate the legal ways to
//! hand the node's taxonomy child-labels to those successors, drop the ones
//! where two branches would be required to contain the same anatomy, and
//! score the rest by how far each branch direction is from its label's
//! reference vector.

use std::collections::HashSet;

use itertools::{Either, Itertools};

use airway_kernel::geometry::{angle_between, sub, AngularCost};
use airway_kernel::taxonomy::Taxonomy;
use airway_kernel::tree::{LabeledTree, NodeIx};

use crate::policy::{SearchPolicy, VectorRule};

/// One successor and the label it receives (`None` = left unclassified).
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub node: NodeIx,
    pub label: Option<String>,
    /// Angle to the label's reference vector, when it has one and the
    /// permutation was scored.
    pub angle: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Permutation {
    pub assignments: Vec<Assignment>,
    /// Summed search cost of the scored branches.
    pub cost: f64,
}

impl Permutation {
    /// Write the assigned labels (and branch search costs) into `tree`.
    /// `None` assignments keep their placeholder.
    pub fn apply_to(&self, tree: &mut LabeledTree) {
        for a in &self.assignments {
            if let Some(label) = &a.label {
                tree.set_label(a.node, label.clone());
            }
            if let Some(angle) = a.angle {
                tree.set_cost(a.node, AngularCost::SEARCH.cost_of_angle(angle));
            }
        }
    }

    /// Successors whose new label has a taxonomy entry and so still need
    /// their own children classified.
    pub fn labeled_nodes<'a>(&'a self, taxonomy: &'a Taxonomy) -> impl Iterator<Item = NodeIx> + 'a {
        self.assignments
            .iter()
            .filter(|a| a.label.as_deref().is_some_and(|l| taxonomy.contains(l)))
            .map(|a| a.node)
    }

    /// Labels in successor order, for logging and tests.
    #[must_use]
    pub fn labels(&self) -> Vec<Option<&str>> {
        self.assignments.iter().map(|a| a.label.as_deref()).collect()
    }
}

/// Surviving permutations in ascending cost order, plus counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermutationSet {
    pub permutations: Vec<Permutation>,
    /// Distinct permutations looked at.
    pub enumerated: u64,
    /// Distinct permutations dropped for shared descendants.
    pub rejected: u64,
    /// Enumeration stopped at `max_permutations_per_node`.
    pub capped: bool,
}

/// Enumerate the permutations for the successors of `node`.
///
/// Returns an empty set when the node's label has no taxonomy entry: such a
/// node is a leaf of the search.
///
/// Enumeration order is the canonical one (see [`placements`]), and each
/// distinct assignment is visited once and counts once against
/// `max_permutations_per_node`. When a surviving permutation is not
/// comparable by direction (see [`VectorRule`]) it is kept with cost 0 and
/// enumeration stops there. The result is stably sorted by cost.
#[must_use]
pub fn enumerate(
    taxonomy: &Taxonomy,
    tree: &LabeledTree,
    node: NodeIx,
    policy: &SearchPolicy,
) -> PermutationSet {
    let mut set = PermutationSet::default();
    let Some(entry) = taxonomy.get(tree.label(node)) else {
        return set;
    };

    let successors = tree.successors(node);
    let in_use = tree.labels_in_use();
    let candidates: Vec<&str> = entry
        .children
        .iter()
        .map(String::as_str)
        .filter(|c| !in_use.contains(c))
        .collect();

    let origin = tree.position(node);
    let mut seen: HashSet<Vec<Option<&str>>> = HashSet::new();
    for perm in placements(&candidates, successors.len()) {
        if !seen.insert(perm.clone()) {
            continue;
        }
        if set.enumerated >= policy.max_permutations_per_node {
            set.capped = true;
            log::warn!(
                "permutation cap {} reached at node {}",
                policy.max_permutations_per_node,
                tree.node_id(node)
            );
            break;
        }
        set.enumerated += 1;

        if shares_descendants(taxonomy, &perm) {
            set.rejected += 1;
            continue;
        }

        if !is_geometric(taxonomy, &perm, policy.vector_rule) {
            set.permutations.push(Permutation {
                assignments: unscored(successors, &perm),
                cost: 0.0,
            });
            break;
        }

        let assignments: Vec<Assignment> = successors
            .iter()
            .zip(&perm)
            .map(|(&child, label)| {
                let angle = label
                    .and_then(|l| taxonomy.get(l))
                    .and_then(|e| e.vector)
                    .map(|target| angle_between(sub(tree.position(child), origin), target));
                Assignment {
                    node: child,
                    label: label.map(str::to_string),
                    angle,
                }
            })
            .collect();
        let cost = assignments
            .iter()
            .filter_map(|a| a.angle)
            .map(|angle| AngularCost::SEARCH.cost_of_angle(angle))
            .sum();
        set.permutations.push(Permutation { assignments, cost });
    }

    set.permutations.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    set
}

/// Label-to-successor assignments in canonical order.
///
/// With at least as many candidates as successors, every ordered choice of
/// candidates is one assignment. Otherwise every candidate is placed and the
/// successors left over stay unclassified; the candidates walk through the
/// successor positions in lexicographic order, so each assignment appears
/// exactly once (barring duplicate candidate labels).
fn placements<'a>(
    candidates: &'a [&'a str],
    successors: usize,
) -> impl Iterator<Item = Vec<Option<&'a str>>> + 'a {
    if candidates.len() >= successors {
        Either::Left(candidates.iter().map(|&c| Some(c)).permutations(successors))
    } else {
        Either::Right((0..successors).permutations(candidates.len()).map(
            move |positions| {
                let mut slots = vec![None; successors];
                for (&label, pos) in candidates.iter().zip(positions) {
                    slots[pos] = Some(label);
                }
                slots
            },
        ))
    }
}

/// Whether two assigned labels claim overlapping `{label} ∪ deep_descendants`.
fn shares_descendants(taxonomy: &Taxonomy, perm: &[Option<&str>]) -> bool {
    let mut claimed: HashSet<&str> = HashSet::new();
    for &label in perm.iter().flatten() {
        if !claimed.insert(label) {
            return true;
        }
        if let Some(deep) = taxonomy.deep_descendants(label) {
            for d in deep {
                if !claimed.insert(d.as_str()) {
                    return true;
                }
            }
        }
    }
    false
}

/// Only assigned labels take part: an unclassified slot neither makes a
/// permutation geometric nor stops it from being one.
fn is_geometric(taxonomy: &Taxonomy, perm: &[Option<&str>], rule: VectorRule) -> bool {
    let has_vector = |label: &&str| taxonomy.get(label).is_some_and(|e| e.vector.is_some());
    let mut labels = perm.iter().flatten().peekable();
    match rule {
        VectorRule::All => labels.peek().is_some() && labels.all(has_vector),
        VectorRule::Any => labels.any(has_vector),
    }
}

fn unscored(successors: &[NodeIx], perm: &[Option<&str>]) -> Vec<Assignment> {
    successors
        .iter()
        .zip(perm)
        .map(|(&node, label)| Assignment {
            node,
            label: label.map(str::to_string),
            angle: None,
        })
        .collect()
}
