//! Labeled tree: extracted split topology plus per-snapshot labels and costs.
//!
//! The parent/child relation is fixed by extraction and shared between every
//! snapshot through an `Arc`. Only labels, costs and colors vary, so cloning
//! a [`LabeledTree`] copies three flat vectors and never aliases node data
//! between search states.

mod document;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::geometry::{sub, Vec3};
use crate::taxonomy::Taxonomy;

pub use document::{EdgeRecord, NodeRecord, TreeDocument};

/// Index of a node in the tree arena.
pub type NodeIx = usize;

/// Id of the root node in every extracted tree.
pub const ROOT_NODE_ID: &str = "0";

/// Seed cost from which depth-decaying node costs are halved.
pub const SEED_COST_SENTINEL: f64 = 1_000_000.0;

/// Placeholder label for a node that has not been classified.
#[must_use]
pub fn placeholder_label(node_id: &str) -> String {
    format!("c{node_id}")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("tree has no root node \"0\"")]
    MissingRoot,
    #[error("node id {id:?} appears more than once")]
    DuplicateNode { id: String },
    #[error("edge {from:?} -> {to:?} names unknown node {missing:?}")]
    UnknownEndpoint {
        from: String,
        to: String,
        missing: String,
    },
}

/// Immutable per-node data from extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    pub id: String,
    pub position: Vec3,
    pub group_size: f64,
    /// Extraction attributes passed through to the output.
    pub attributes: Map<String, Value>,
}

/// Direction of one airway segment, parent split → child split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchVector {
    pub parent: NodeIx,
    pub child: NodeIx,
    pub vector: Vec3,
}

#[derive(Debug)]
struct Topology {
    nodes: Vec<SplitNode>,
    parent: Vec<Option<NodeIx>>,
    successors: Vec<Vec<NodeIx>>,
    index: HashMap<String, NodeIx>,
    root: NodeIx,
    graph: Map<String, Value>,
    edges: Vec<EdgeRecord>,
}

/// A rooted split tree with one label and one cost per node.
#[derive(Debug, Clone)]
pub struct LabeledTree {
    topology: Arc<Topology>,
    labels: Vec<String>,
    costs: Vec<f64>,
    colors: Vec<Option<Value>>,
}

impl LabeledTree {
    /// Build the tree from an extracted document and initialize labels.
    ///
    /// Successors are derived breadth-first from node `"0"` over the edge
    /// list taken as undirected, visiting neighbours in edge order. The root
    /// receives `root_label`, every other node its placeholder `"c{id}"`.
    /// Seed costs halve with depth starting from [`SEED_COST_SENTINEL`]; the
    /// root's cost is 0.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError`] if the root is missing, a node id is repeated,
    /// or an edge names an unknown node.
    pub fn from_document(doc: TreeDocument, root_label: &str) -> Result<Self, TreeError> {
        let TreeDocument {
            graph,
            nodes: records,
            edges,
        } = doc;

        let mut index = HashMap::with_capacity(records.len());
        let mut nodes = Vec::with_capacity(records.len());
        for record in records {
            if index.insert(record.id.clone(), nodes.len()).is_some() {
                return Err(TreeError::DuplicateNode { id: record.id });
            }
            nodes.push(SplitNode {
                id: record.id,
                position: [record.x, record.y, record.z],
                group_size: record.group_size,
                attributes: record.attributes,
            });
        }
        let root = *index.get(ROOT_NODE_ID).ok_or(TreeError::MissingRoot)?;

        let mut adjacency: Vec<Vec<NodeIx>> = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            let lookup = |id: &str| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| TreeError::UnknownEndpoint {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        missing: id.to_string(),
                    })
            };
            let a = lookup(&edge.source)?;
            let b = lookup(&edge.target)?;
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        let mut parent = vec![None; nodes.len()];
        let mut successors: Vec<Vec<NodeIx>> = vec![Vec::new(); nodes.len()];
        let mut depth: Vec<Option<u32>> = vec![None; nodes.len()];
        depth[root] = Some(0);
        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            let next_depth = depth[u].map_or(0, |d| d + 1);
            for &v in &adjacency[u] {
                if depth[v].is_some() {
                    continue;
                }
                depth[v] = Some(next_depth);
                parent[v] = Some(u);
                successors[u].push(v);
                queue.push_back(v);
            }
        }

        let unreachable = depth.iter().filter(|d| d.is_none()).count();
        if unreachable > 0 {
            log::warn!("{unreachable} node(s) are not connected to the root and stay unclassified");
        }

        let labels = nodes
            .iter()
            .enumerate()
            .map(|(ix, n)| {
                if ix == root {
                    root_label.to_string()
                } else {
                    placeholder_label(&n.id)
                }
            })
            .collect();
        let costs = depth
            .iter()
            .map(|d| match d {
                Some(0) => 0.0,
                Some(d) => SEED_COST_SENTINEL / 2f64.powi(i32::try_from(*d).unwrap_or(i32::MAX)),
                None => SEED_COST_SENTINEL,
            })
            .collect();
        let colors = vec![None; nodes.len()];

        Ok(Self {
            topology: Arc::new(Topology {
                nodes,
                parent,
                successors,
                index,
                root,
                graph,
                edges,
            }),
            labels,
            costs,
            colors,
        })
    }

    #[must_use]
    pub fn root(&self) -> NodeIx {
        self.topology.root
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topology.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topology.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, ix: NodeIx) -> &SplitNode {
        &self.topology.nodes[ix]
    }

    #[must_use]
    pub fn node_id(&self, ix: NodeIx) -> &str {
        &self.topology.nodes[ix].id
    }

    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIx> {
        self.topology.index.get(id).copied()
    }

    #[must_use]
    pub fn position(&self, ix: NodeIx) -> Vec3 {
        self.topology.nodes[ix].position
    }

    #[must_use]
    pub fn parent(&self, ix: NodeIx) -> Option<NodeIx> {
        self.topology.parent[ix]
    }

    /// Immediate successors in breadth-first discovery order.
    #[must_use]
    pub fn successors(&self, ix: NodeIx) -> &[NodeIx] {
        &self.topology.successors[ix]
    }

    #[must_use]
    pub fn label(&self, ix: NodeIx) -> &str {
        &self.labels[ix]
    }

    pub fn set_label(&mut self, ix: NodeIx, label: impl Into<String>) {
        self.labels[ix] = label.into();
    }

    #[must_use]
    pub fn cost(&self, ix: NodeIx) -> f64 {
        self.costs[ix]
    }

    pub fn set_cost(&mut self, ix: NodeIx, cost: f64) {
        self.costs[ix] = cost;
    }

    #[must_use]
    pub fn color(&self, ix: NodeIx) -> Option<&Value> {
        self.colors[ix].as_ref()
    }

    /// Whether the node still carries its `"c{id}"` placeholder.
    #[must_use]
    pub fn is_placeholder(&self, ix: NodeIx) -> bool {
        let label = &self.labels[ix];
        let id = &self.topology.nodes[ix].id;
        label.len() == id.len() + 1 && label.starts_with('c') && label.ends_with(id.as_str())
    }

    /// Every label currently assigned anywhere in the tree.
    #[must_use]
    pub fn labels_in_use(&self) -> HashSet<&str> {
        self.labels.iter().map(String::as_str).collect()
    }

    /// Nodes reachable from the root, parents before children, siblings in
    /// successor order.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeIx> {
        self.preorder_from(self.root())
    }

    #[must_use]
    pub fn preorder_from(&self, start: NodeIx) -> Vec<NodeIx> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![start];
        while let Some(ix) = stack.pop() {
            order.push(ix);
            stack.extend(self.successors(ix).iter().rev());
        }
        order
    }

    /// Labels of reachable nodes in preorder.
    #[must_use]
    pub fn all_labels(&self) -> Vec<&str> {
        self.preorder().into_iter().map(|ix| self.label(ix)).collect()
    }

    /// Reachable nodes that kept their placeholder label.
    #[must_use]
    pub fn unclassified_nodes(&self) -> Vec<NodeIx> {
        self.preorder()
            .into_iter()
            .filter(|&ix| self.is_placeholder(ix))
            .collect()
    }

    /// Sum of node costs over the reachable tree.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.preorder().into_iter().map(|ix| self.cost(ix)).sum()
    }

    /// Direction parent → `child`, `None` for the root.
    #[must_use]
    pub fn branch_vector(&self, child: NodeIx) -> Option<Vec3> {
        self.parent(child)
            .map(|p| sub(self.position(child), self.position(p)))
    }

    /// Every segment direction in preorder of the child.
    #[must_use]
    pub fn branch_vectors(&self) -> Vec<BranchVector> {
        self.preorder()
            .into_iter()
            .filter_map(|child| {
                let parent = self.parent(child)?;
                Some(BranchVector {
                    parent,
                    child,
                    vector: sub(self.position(child), self.position(parent)),
                })
            })
            .collect()
    }

    /// Set each node's color from its label's taxonomy entry, if any.
    pub fn apply_colors(&mut self, taxonomy: &Taxonomy) {
        for (ix, label) in self.labels.iter().enumerate() {
            self.colors[ix] = taxonomy.get(label).and_then(|e| e.color.clone());
        }
    }

    /// Serialize back into a document carrying labels, costs and colors.
    #[must_use]
    pub fn to_document(&self) -> TreeDocument {
        let topology = &self.topology;
        let nodes = topology
            .nodes
            .iter()
            .enumerate()
            .map(|(ix, n)| NodeRecord {
                id: n.id.clone(),
                x: n.position[0],
                y: n.position[1],
                z: n.position[2],
                group_size: n.group_size,
                split_classification: Some(self.labels[ix].clone()),
                cost: Some(self.costs[ix]),
                color: self.colors[ix].clone(),
                attributes: n.attributes.clone(),
            })
            .collect();
        TreeDocument {
            graph: topology.graph.clone(),
            nodes,
            edges: topology.edges.clone(),
        }
    }
}
