//! Builders shared by unit tests.

use serde_json::Map;

use airway_kernel::geometry::Vec3;
use airway_kernel::taxonomy::{Taxonomy, TaxonomyOptions, DEFAULT_ROOT_LABEL};
use airway_kernel::tree::{EdgeRecord, LabeledTree, NodeRecord, TreeDocument};

pub(crate) fn taxonomy(text: &str) -> Taxonomy {
    Taxonomy::load(text, &TaxonomyOptions::default()).unwrap()
}

/// Node `i` gets id `"i"` and `positions[i]`; edges are `(parent, child)`.
pub(crate) fn tree(positions: &[Vec3], edges: &[(usize, usize)]) -> LabeledTree {
    let doc = TreeDocument {
        graph: Map::new(),
        nodes: positions
            .iter()
            .enumerate()
            .map(|(i, p)| NodeRecord {
                id: i.to_string(),
                x: p[0],
                y: p[1],
                z: p[2],
                group_size: 1.0,
                split_classification: None,
                cost: None,
                color: None,
                attributes: Map::new(),
            })
            .collect(),
        edges: edges
            .iter()
            .map(|(a, b)| EdgeRecord {
                source: a.to_string(),
                target: b.to_string(),
                attributes: Map::new(),
            })
            .collect(),
    };
    LabeledTree::from_document(doc, DEFAULT_ROOT_LABEL).unwrap()
}
