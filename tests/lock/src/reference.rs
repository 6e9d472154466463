//! Exhaustive reference search for optimality checks on small trees.
//!
//! Only the data model and the validity checker are shared with the
//! engine. Assignments, overlap filtering and angles are all worked out
//! here, expanding nodes in breadth-first worklist order: a node's
//! candidates are its taxonomy children not yet used anywhere in the tree,
//! and a node with fewer candidates than successors leaves the surplus
//! successors unclassified.
//!
//! Every assigned label with a reference vector adds its angle to the
//! cost. That agrees with both vector rules only when every child label
//! carries a vector, so use it with such taxonomies. `take_best` is
//! ignored: every assignment is explored at every node.

use std::collections::{BTreeSet, HashSet};

use airway_kernel::geometry::Vec3;
use airway_kernel::taxonomy::Taxonomy;
use airway_kernel::tree::{LabeledTree, NodeIx};
use airway_kernel::validity::is_valid;

/// Every complete labeling reachable from the root, with its cost and
/// validity, in depth-first order.
#[must_use]
pub fn all_complete_labelings(taxonomy: &Taxonomy, tree: &LabeledTree) -> Vec<(f64, bool, LabeledTree)> {
    let mut out = Vec::new();
    walk(taxonomy, 0.0, tree.clone(), vec![tree.root()], &mut out);
    out
}

/// Cheapest valid labeling cost, or `None` if no valid labeling exists.
#[must_use]
pub fn min_valid_cost(taxonomy: &Taxonomy, tree: &LabeledTree) -> Option<f64> {
    all_complete_labelings(taxonomy, tree)
        .into_iter()
        .filter(|(_, valid, _)| *valid)
        .map(|(cost, _, _)| cost)
        .min_by(f64::total_cmp)
}

fn walk(
    taxonomy: &Taxonomy,
    cost: f64,
    tree: LabeledTree,
    mut pending: Vec<NodeIx>,
    out: &mut Vec<(f64, bool, LabeledTree)>,
) {
    if pending.is_empty() {
        let valid = is_valid(&tree, taxonomy);
        out.push((cost, valid, tree));
        return;
    }
    let node = pending.remove(0);
    let Some(entry) = taxonomy.get(tree.label(node)) else {
        walk(taxonomy, cost, tree, pending, out);
        return;
    };

    let successors = tree.successors(node).to_vec();
    let used: HashSet<String> = tree.labels_in_use().into_iter().map(str::to_string).collect();
    let candidates: Vec<String> = entry
        .children
        .iter()
        .filter(|c| !used.contains(*c))
        .cloned()
        .collect();

    let mut assignments = Vec::new();
    assign(
        &candidates,
        successors.len(),
        successors.len().saturating_sub(candidates.len()),
        &mut vec![false; candidates.len()],
        &mut Vec::new(),
        &mut assignments,
    );
    assignments.retain(|a| disjoint(taxonomy, a));
    if assignments.is_empty() {
        walk(taxonomy, cost, tree, pending, out);
        return;
    }

    let origin = tree.position(node);
    for labels in assignments {
        let mut branch = tree.clone();
        let mut next = pending.clone();
        let mut added = 0.0;
        for (&child, label) in successors.iter().zip(&labels) {
            let Some(label) = label else { continue };
            branch.set_label(child, label.clone());
            if let Some(child_entry) = taxonomy.get(label) {
                next.push(child);
                if let Some(vector) = child_entry.vector {
                    added += angle(direction(origin, tree.position(child)), vector);
                }
            }
        }
        walk(taxonomy, cost + added, branch, next, out);
    }
}

/// Fill `slots` left to right with an unused candidate or, while `blanks`
/// remain, no label.
fn assign(
    candidates: &[String],
    width: usize,
    blanks: usize,
    taken: &mut [bool],
    slots: &mut Vec<Option<String>>,
    out: &mut Vec<Vec<Option<String>>>,
) {
    if slots.len() == width {
        out.push(slots.clone());
        return;
    }
    for (i, candidate) in candidates.iter().enumerate() {
        if taken[i] {
            continue;
        }
        taken[i] = true;
        slots.push(Some(candidate.clone()));
        assign(candidates, width, blanks, taken, slots, out);
        slots.pop();
        taken[i] = false;
    }
    let used_blanks = slots.iter().filter(|s| s.is_none()).count();
    if used_blanks < blanks {
        slots.push(None);
        assign(candidates, width, blanks, taken, slots, out);
        slots.pop();
    }
}

/// No two labels of one assignment may cover the same anatomy.
fn disjoint(taxonomy: &Taxonomy, labels: &[Option<String>]) -> bool {
    let covered: Vec<BTreeSet<&str>> = labels
        .iter()
        .flatten()
        .map(|label| {
            let mut set = BTreeSet::from([label.as_str()]);
            if let Some(deep) = taxonomy.deep_descendants(label) {
                set.extend(deep.iter().map(String::as_str));
            }
            set
        })
        .collect();
    covered
        .iter()
        .enumerate()
        .all(|(i, a)| covered[i + 1..].iter().all(|b| a.is_disjoint(b)))
}

fn direction(from: Vec3, to: Vec3) -> Vec3 {
    [to[0] - from[0], to[1] - from[1], to[2] - from[2]]
}

fn angle(v: Vec3, target: Vec3) -> f64 {
    let dot = |a: Vec3, b: Vec3| a[0] * b[0] + a[1] * b[1] + a[2] * b[2];
    let denom = dot(v, v).sqrt() * dot(target, target).sqrt();
    if denom == 0.0 {
        return std::f64::consts::FRAC_PI_2;
    }
    (dot(v, target) / denom).clamp(-1.0, 1.0).acos()
}
