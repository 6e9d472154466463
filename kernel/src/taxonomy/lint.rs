//! Consistency checks over a loaded taxonomy.
//!
//! Lint findings never prevent loading; they flag configurations that load
//! fine but are probably typos.

use std::collections::{BTreeMap, BTreeSet};

use super::{ReferenceKind, Taxonomy};
use crate::geometry::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum LintWarning {
    /// Two or more labels share the exact same reference vector.
    DuplicateVector { labels: Vec<String>, vector: Vec3 },
    UnknownReference {
        label: String,
        reference: String,
        kind: ReferenceKind,
    },
    /// An accumulated segment label (`"LB1+2"`) lacks one of its segments
    /// (`"LB1"`) among its children.
    MissingSegmentChild { label: String, segment: String },
    /// `take_best` on a label that is not reachable from the root through
    /// `take_best` labels only.
    TakeBestBelowTopLevel { label: String },
}

impl std::fmt::Display for LintWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateVector { labels, vector } => {
                write!(f, "vector {vector:?} is shared by {}", labels.join(", "))
            }
            Self::UnknownReference {
                label,
                reference,
                kind,
            } => write!(f, "{label} references unknown {kind} {reference}"),
            Self::MissingSegmentChild { label, segment } => {
                write!(f, "{label} does not list its segment {segment} as a child")
            }
            Self::TakeBestBelowTopLevel { label } => {
                write!(f, "{label} sets take_best below the top levels")
            }
        }
    }
}

impl Taxonomy {
    /// Run every lint check, in a deterministic order.
    #[must_use]
    pub fn lint(&self) -> Vec<LintWarning> {
        let mut warnings = self.duplicate_vectors();
        warnings.extend(self.unknown_references().into_iter().map(
            |(label, reference, kind)| LintWarning::UnknownReference {
                label,
                reference,
                kind,
            },
        ));
        warnings.extend(self.missing_segment_children());
        warnings.extend(self.misplaced_take_best());
        warnings
    }

    fn duplicate_vectors(&self) -> Vec<LintWarning> {
        let mut by_vector: BTreeMap<[u64; 3], (Vec3, Vec<String>)> = BTreeMap::new();
        for entry in self.entries() {
            if let Some(v) = entry.vector {
                by_vector
                    .entry(v.map(f64::to_bits))
                    .or_insert_with(|| (v, Vec::new()))
                    .1
                    .push(entry.name.clone());
            }
        }
        by_vector
            .into_values()
            .filter(|(_, labels)| labels.len() > 1)
            .map(|(vector, labels)| LintWarning::DuplicateVector { labels, vector })
            .collect()
    }

    fn missing_segment_children(&self) -> Vec<LintWarning> {
        let mut warnings = Vec::new();
        for entry in self.entries() {
            if !entry.name.contains('+') {
                continue;
            }
            let (Some(prefix), Some(numbers)) = (entry.name.get(..2), entry.name.get(2..)) else {
                continue;
            };
            for number in numbers.split('+') {
                let segment = format!("{prefix}{number}");
                if !entry.children.contains(&segment) {
                    warnings.push(LintWarning::MissingSegmentChild {
                        label: entry.name.clone(),
                        segment,
                    });
                }
            }
        }
        warnings
    }

    fn misplaced_take_best(&self) -> Vec<LintWarning> {
        let mut top_level: BTreeSet<&str> = BTreeSet::new();
        let mut stack = vec![self.root_label()];
        while let Some(label) = stack.pop() {
            if !top_level.insert(label) {
                continue;
            }
            if let Some(entry) = self.get(label) {
                if entry.take_best {
                    stack.extend(entry.children.iter().map(String::as_str));
                }
            }
        }

        self.entries()
            .filter(|e| e.take_best && !top_level.contains(e.name.as_str()))
            .map(|e| LintWarning::TakeBestBelowTopLevel {
                label: e.name.clone(),
            })
            .collect()
    }
}
