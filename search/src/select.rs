//! Result selection: the checked entry point that turns a search result
//! into the classified tree handed downstream.

use airway_kernel::geometry::{sub, AngularCost};
use airway_kernel::taxonomy::Taxonomy;
use airway_kernel::tree::LabeledTree;
use airway_kernel::validity::Violation;

use crate::error::SearchError;
use crate::policy::SearchPolicy;
use crate::search::{search, ExpandEvent, TerminationReason};
use crate::stats::SearchStats;

/// A classified tree plus the evidence of how it was chosen.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Labels, diagnostic costs and colors applied.
    pub tree: LabeledTree,
    /// Accumulated search cost of the chosen labeling.
    pub cost: f64,
    /// `false` means the tree is the cheapest invalid fallback and the
    /// patient needs manual review.
    pub valid: bool,
    pub termination: TerminationReason,
    pub violation: Option<Violation>,
    pub stats: SearchStats,
    pub trace: Vec<ExpandEvent>,
}

/// Classify every split of `tree` against `taxonomy`.
///
/// Never fails once the search has started: exhaustion and budget overrun
/// yield the cheapest candidate with `valid = false`.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPolicy`] if the policy fails validation and
/// [`SearchError::UnknownRootLabel`] if the root's label is not a taxonomy
/// entry.
pub fn classify(
    taxonomy: &Taxonomy,
    tree: LabeledTree,
    policy: &SearchPolicy,
) -> Result<Classification, SearchError> {
    policy.validate()?;
    let root_label = tree.label(tree.root());
    if !taxonomy.contains(root_label) {
        return Err(SearchError::UnknownRootLabel {
            label: root_label.to_string(),
        });
    }

    let result = search(taxonomy, tree, policy);
    let valid = result.is_valid();
    if valid {
        log::info!(
            "classified {} splits at cost {:.4} after {} expansions ({} invalid trees discarded)",
            result.tree.len(),
            result.cost,
            result.stats.expansions,
            result.stats.trees_discarded
        );
    } else {
        log::warn!(
            "only invalid trees possible ({}); using the cheapest candidate at cost {:.4}{}",
            result.termination,
            result.cost,
            result
                .violation
                .as_ref()
                .map(|v| format!(": {v}"))
                .unwrap_or_default()
        );
    }

    let mut tree = result.tree;
    finalize_costs(&mut tree, taxonomy);
    tree.apply_colors(taxonomy);

    Ok(Classification {
        tree,
        cost: result.cost,
        valid,
        termination: result.termination,
        violation: result.violation,
        stats: result.stats,
        trace: result.trace,
    })
}

/// Overwrite each non-root node's cost with the diagnostic angular cost of
/// its branch, when its label has a reference vector. Other nodes keep the
/// cost they carried out of the search.
pub fn finalize_costs(tree: &mut LabeledTree, taxonomy: &Taxonomy) {
    for ix in tree.preorder() {
        let Some(parent) = tree.parent(ix) else {
            continue;
        };
        let Some(target) = taxonomy.get(tree.label(ix)).and_then(|e| e.vector) else {
            continue;
        };
        let branch = sub(tree.position(ix), tree.position(parent));
        tree.set_cost(ix, AngularCost::DIAGNOSTIC.cost(branch, target));
    }
}
