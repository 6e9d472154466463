//! Validity checker: the two global structural invariants of a labeling.
//!
//! A labeled tree is valid iff
//! - no label appears on two nodes, and
//! - for every node labeled `L`, every label in `taxonomy[L].descendants`
//!   appears somewhere in the strict subtree below that node.
//!
//! Both are checked in one depth-first pass sharing a `required`
//! accumulator: a label seen anywhere in the walk discharges any pending
//! requirement for it, and each node verifies on the way back up that none
//! of its own requirements are still pending.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::taxonomy::Taxonomy;
use crate::tree::{LabeledTree, NodeIx};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("label {label} appears twice (again at node {node_id})")]
    DuplicateLabel { label: String, node_id: String },
    #[error("node {node_id} ({label}) requires descendants {missing:?} that are not in its subtree")]
    UnsatisfiedDescendant {
        label: String,
        node_id: String,
        missing: BTreeSet<String>,
    },
}

/// Check the whole tree from its root.
///
/// # Errors
///
/// Returns the first [`Violation`] found in depth-first order.
pub fn check_tree(tree: &LabeledTree, taxonomy: &Taxonomy) -> Result<(), Violation> {
    check_subtree(tree, taxonomy, tree.root())
}

/// Check only the subtree rooted at `start`.
///
/// # Errors
///
/// Returns the first [`Violation`] found in depth-first order.
pub fn check_subtree(
    tree: &LabeledTree,
    taxonomy: &Taxonomy,
    start: NodeIx,
) -> Result<(), Violation> {
    let mut walk = Walk {
        tree,
        taxonomy,
        required: BTreeSet::new(),
        have_appeared: HashSet::new(),
    };
    walk.visit(start)
}

/// Convenience wrapper for property checks.
#[must_use]
pub fn is_valid(tree: &LabeledTree, taxonomy: &Taxonomy) -> bool {
    check_tree(tree, taxonomy).is_ok()
}

struct Walk<'a> {
    tree: &'a LabeledTree,
    taxonomy: &'a Taxonomy,
    required: BTreeSet<&'a str>,
    have_appeared: HashSet<&'a str>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, ix: NodeIx) -> Result<(), Violation> {
        let tree = self.tree;
        let taxonomy = self.taxonomy;
        let label = tree.label(ix);

        if !self.have_appeared.insert(label) {
            return Err(Violation::DuplicateLabel {
                label: label.to_string(),
                node_id: tree.node_id(ix).to_string(),
            });
        }

        self.required.remove(label);
        let own: Option<&'a BTreeSet<String>> = taxonomy.get(label).map(|e| &e.descendants);
        if let Some(own) = own {
            self.required.extend(own.iter().map(String::as_str));
        }

        for &child in tree.successors(ix) {
            self.visit(child)?;
        }

        if let Some(own) = own {
            let missing: BTreeSet<String> = own
                .iter()
                .filter(|d| self.required.contains(d.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(Violation::UnsatisfiedDescendant {
                    label: label.to_string(),
                    node_id: tree.node_id(ix).to_string(),
                    missing,
                });
            }
        }
        Ok(())
    }
}
