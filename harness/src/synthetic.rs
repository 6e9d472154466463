//! Ideal trees generated from a taxonomy, for tests and benchmarks.
//!
//! Starting at the root label, every child label that has a reference
//! vector becomes a node placed exactly along that vector from its parent.
//! Labels without a vector are not placed, nor is anything below them. A
//! label reachable from several parents is placed once, under the first
//! parent in breadth-first order.

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde_json::Map;

use airway_kernel::geometry::{norm, Vec3};
use airway_kernel::taxonomy::Taxonomy;
use airway_kernel::tree::{EdgeRecord, NodeRecord, TreeDocument, ROOT_NODE_ID};

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticOptions {
    /// Length of the first segment below the root.
    pub trunk_length: f64,
    /// Each generation's segments are this fraction of the previous one's.
    pub decay: f64,
    /// Add one unlabeled leaf below every clustering end node, the way
    /// extraction over-segments peripheral airways.
    pub twig_per_endnode: bool,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            trunk_length: 40.0,
            decay: 0.75,
            twig_per_endnode: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticTree {
    pub document: TreeDocument,
    /// Label each node id was generated for; `None` for twigs.
    pub expected: BTreeMap<String, Option<String>>,
}

struct Pending {
    id: String,
    label: String,
    position: Vec3,
    incoming: Vec3,
    generation: i32,
}

/// Build the ideal tree for `taxonomy`.
#[must_use]
pub fn ideal_tree(taxonomy: &Taxonomy, options: &SyntheticOptions) -> SyntheticTree {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut expected = BTreeMap::new();
    let mut placed: HashSet<String> = HashSet::new();
    let mut queue = VecDeque::new();

    let root_label = taxonomy.root_label().to_string();
    nodes.push(node(ROOT_NODE_ID, [0.0; 3], 0));
    expected.insert(ROOT_NODE_ID.to_string(), Some(root_label.clone()));
    placed.insert(root_label.clone());
    queue.push_back(Pending {
        id: ROOT_NODE_ID.to_string(),
        label: root_label,
        position: [0.0; 3],
        incoming: [0.0, 0.0, -1.0],
        generation: 0,
    });

    while let Some(parent) = queue.pop_front() {
        let Some(entry) = taxonomy.get(&parent.label) else {
            continue;
        };
        let length = options.trunk_length * options.decay.powi(parent.generation);
        for child in &entry.children {
            if placed.contains(child) {
                continue;
            }
            let Some(vector) = taxonomy.get(child).and_then(|e| e.vector) else {
                continue;
            };
            placed.insert(child.clone());
            let direction = unit(vector);
            let id = nodes.len().to_string();
            let position = step(parent.position, direction, length);
            nodes.push(node(&id, position, parent.generation + 1));
            edges.push(edge(&parent.id, &id));
            expected.insert(id.clone(), Some(child.clone()));
            queue.push_back(Pending {
                id,
                label: child.clone(),
                position,
                incoming: direction,
                generation: parent.generation + 1,
            });
        }
        if options.twig_per_endnode && entry.clustering_endnode {
            let id = nodes.len().to_string();
            let position = step(parent.position, parent.incoming, length * 0.5);
            nodes.push(node(&id, position, parent.generation + 1));
            edges.push(edge(&parent.id, &id));
            expected.insert(id, None);
        }
    }

    SyntheticTree {
        document: TreeDocument {
            graph: Map::new(),
            nodes,
            edges,
        },
        expected,
    }
}

fn unit(v: Vec3) -> Vec3 {
    let n = norm(v);
    [v[0] / n, v[1] / n, v[2] / n]
}

fn step(from: Vec3, direction: Vec3, length: f64) -> Vec3 {
    [
        from[0] + direction[0] * length,
        from[1] + direction[1] * length,
        from[2] + direction[2] * length,
    ]
}

fn node(id: &str, position: Vec3, generation: i32) -> NodeRecord {
    NodeRecord {
        id: id.to_string(),
        x: position[0],
        y: position[1],
        z: position[2],
        group_size: 40.0 / f64::from(generation + 1),
        split_classification: None,
        cost: None,
        color: None,
        attributes: Map::new(),
    }
}

fn edge(source: &str, target: &str) -> EdgeRecord {
    EdgeRecord {
        source: source.to_string(),
        target: target.to_string(),
        attributes: Map::new(),
    }
}
