//! Classification report written next to the classified tree.
//!
//! Downstream quality tooling reads this instead of re-deriving validity:
//! it carries content digests of the three inputs/outputs, the termination
//! reason, per-branch angles and the search counters.

use std::collections::BTreeSet;

use serde::Serialize;

use airway_kernel::digest::canon::{canonical_json_bytes, to_canonical_json_bytes};
use airway_kernel::digest::hash::{
    canonical_hash, DOMAIN_CLASSIFIED_TREE, DOMAIN_INPUT_TREE, DOMAIN_TAXONOMY,
};
use airway_kernel::geometry::angle_between;
use airway_kernel::taxonomy::Taxonomy;
use airway_kernel::tree::{LabeledTree, TreeDocument};
use airway_search::{Classification, SearchStats, TerminationReason};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchReport {
    pub parent: String,
    pub child: String,
    pub label: String,
    /// Extraction group size of the child split.
    pub group_size: f64,
    /// Angle to the label's reference vector, when it has one.
    pub angle_degrees: Option<f64>,
    /// The node's final (diagnostic) cost.
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub taxonomy_digest: String,
    pub input_digest: String,
    pub output_digest: String,
    pub valid: bool,
    pub termination: TerminationReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<String>,
    pub search_cost: f64,
    /// Sum of final node costs over the reachable tree.
    pub total_node_cost: f64,
    pub node_count: usize,
    pub unclassified_nodes: Vec<String>,
    pub endnodes_found: Vec<String>,
    pub endnodes_missing: Vec<String>,
    pub branches: Vec<BranchReport>,
    pub stats: SearchStats,
}

impl ClassificationReport {
    /// # Errors
    ///
    /// Returns the `serde_json` error if a tree document cannot be
    /// canonicalized.
    pub fn build(
        taxonomy: &Taxonomy,
        input: &TreeDocument,
        classification: &Classification,
    ) -> Result<Self, serde_json::Error> {
        let tree = &classification.tree;
        let taxonomy_digest = canonical_hash(
            DOMAIN_TAXONOMY,
            &canonical_json_bytes(&taxonomy.to_json_value()),
        );
        let input_digest = canonical_hash(DOMAIN_INPUT_TREE, &to_canonical_json_bytes(input)?);
        let output_digest = canonical_hash(
            DOMAIN_CLASSIFIED_TREE,
            &to_canonical_json_bytes(&tree.to_document())?,
        );

        let present: BTreeSet<&str> = tree.all_labels().into_iter().collect();
        let (found, missing): (Vec<&str>, Vec<&str>) = taxonomy
            .clustering_endnodes()
            .into_iter()
            .partition(|label| present.contains(label));

        Ok(Self {
            taxonomy_digest: taxonomy_digest.to_string(),
            input_digest: input_digest.to_string(),
            output_digest: output_digest.to_string(),
            valid: classification.valid,
            termination: classification.termination,
            violation: classification.violation.as_ref().map(ToString::to_string),
            search_cost: classification.cost,
            total_node_cost: tree.total_cost(),
            node_count: tree.len(),
            unclassified_nodes: tree
                .unclassified_nodes()
                .into_iter()
                .map(|ix| tree.node_id(ix).to_string())
                .collect(),
            endnodes_found: found.into_iter().map(str::to_string).collect(),
            endnodes_missing: missing.into_iter().map(str::to_string).collect(),
            branches: branches(taxonomy, tree),
            stats: classification.stats.clone(),
        })
    }
}

fn branches(taxonomy: &Taxonomy, tree: &LabeledTree) -> Vec<BranchReport> {
    tree.branch_vectors()
        .into_iter()
        .map(|b| {
            let label = tree.label(b.child);
            BranchReport {
                parent: tree.node_id(b.parent).to_string(),
                child: tree.node_id(b.child).to_string(),
                label: label.to_string(),
                group_size: tree.node(b.child).group_size,
                angle_degrees: taxonomy
                    .get(label)
                    .and_then(|e| e.vector)
                    .map(|target| angle_between(b.vector, target).to_degrees()),
                cost: tree.cost(b.child),
            }
        })
        .collect()
}
