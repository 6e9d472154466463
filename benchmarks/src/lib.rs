//! Shared helpers for airway benchmark suites.

use std::path::PathBuf;

use serde_json::Map;

use airway_harness::synthetic::{ideal_tree, SyntheticOptions};
use airway_kernel::taxonomy::{Taxonomy, TaxonomyOptions, DEFAULT_ROOT_LABEL};
use airway_kernel::tree::{EdgeRecord, LabeledTree, NodeRecord, TreeDocument};

/// The taxonomy shipped in `configs/`.
///
/// # Panics
///
/// Panics if the file is missing or malformed. Benchmark setup failures are
/// fatal.
#[must_use]
pub fn shipped_taxonomy() -> Taxonomy {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("configs")
        .join("classification.json5");
    Taxonomy::from_path(&path, &TaxonomyOptions::default()).expect("shipped taxonomy")
}

/// Ideal tree for `taxonomy`, optionally with one twig per end node.
///
/// # Panics
///
/// Panics if the generated document does not build a tree.
#[must_use]
pub fn synthetic_tree(taxonomy: &Taxonomy, twigs: bool) -> LabeledTree {
    let options = SyntheticOptions {
        twig_per_endnode: twigs,
        ..SyntheticOptions::default()
    };
    let doc = ideal_tree(taxonomy, &options).document;
    LabeledTree::from_document(doc, taxonomy.root_label()).expect("synthetic tree")
}

/// A taxonomy whose root has `width` vector-less children, and a tree whose
/// root has `successors` children: the worst case for permutation counts.
///
/// # Panics
///
/// Panics if the generated taxonomy or tree is malformed.
#[must_use]
pub fn wide_level(width: usize, successors: usize) -> (Taxonomy, LabeledTree) {
    let children: Vec<String> = (0..width).map(|i| format!("\"S{i}\"")).collect();
    let mut text = format!(
        "{{ {DEFAULT_ROOT_LABEL}: {{ children: [{}] }},",
        children.join(", ")
    );
    for i in 0..width {
        #[allow(clippy::cast_precision_loss)]
        let angle = i as f64 * std::f64::consts::TAU / width as f64;
        text.push_str(&format!(
            " S{i}: {{ vector: [{:.6}, {:.6}, -1] }},",
            angle.cos(),
            angle.sin()
        ));
    }
    text.push('}');
    let taxonomy = Taxonomy::load(&text, &TaxonomyOptions::default()).expect("wide taxonomy");

    let mut nodes = vec![node("0", [0.0, 0.0, 0.0])];
    let mut edges = Vec::new();
    for i in 0..successors {
        #[allow(clippy::cast_precision_loss)]
        let angle = i as f64 * std::f64::consts::TAU / successors as f64 + 0.1;
        let id = (i + 1).to_string();
        nodes.push(node(&id, [angle.cos() * 10.0, angle.sin() * 10.0, -10.0]));
        edges.push(EdgeRecord {
            source: "0".into(),
            target: id,
            attributes: Map::new(),
        });
    }
    let doc = TreeDocument {
        graph: Map::new(),
        nodes,
        edges,
    };
    let tree = LabeledTree::from_document(doc, DEFAULT_ROOT_LABEL).expect("wide tree");
    (taxonomy, tree)
}

fn node(id: &str, p: [f64; 3]) -> NodeRecord {
    NodeRecord {
        id: id.into(),
        x: p[0],
        y: p[1],
        z: p[2],
        group_size: 1.0,
        split_classification: None,
        cost: None,
        color: None,
        attributes: Map::new(),
    }
}
