//! Taxonomy model: the anatomical rule set the classifier draws labels from.
//!
//! A taxonomy is loaded once from a JSON5 mapping `label -> entry`, passed
//! through a single defaulting pass ([`apply_defaults`]) and then has its
//! transitive descendant closure computed from the root label
//! ([`Taxonomy::compute_deep_descendants`]). After loading, lookups only
//! need label membership checks; every field of a [`TaxonomyEntry`] is
//! present.
//!
//! Labels referenced as a child or descendant but missing from the
//! taxonomy are tolerated unless [`TaxonomyOptions::strict_references`] is
//! set: they contribute no descendants and no cost.

mod lint;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{is_usable_direction, Vec3};

pub use lint::LintWarning;

/// Label of the taxonomy's top-level entry in the bronchial domain.
pub const DEFAULT_ROOT_LABEL: &str = "Trachea";

/// Which list of an entry a label reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReferenceKind {
    Child,
    Descendant,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Child => f.write_str("child"),
            Self::Descendant => f.write_str("descendant"),
        }
    }
}

/// Failure to load a taxonomy. Raised before any search begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read taxonomy {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("taxonomy is not a valid JSON5 document: {detail}")]
    Syntax { detail: String },
    #[error("taxonomy document must be a mapping from label to entry")]
    NotAMapping,
    #[error("taxonomy entry {label:?} is malformed: {detail}")]
    Entry { label: String, detail: String },
    #[error("taxonomy entry {label:?} has an unusable reference vector {vector:?}")]
    BadVector { label: String, vector: Vec3 },
    #[error("taxonomy has no entry for root label {label:?}")]
    MissingRoot { label: String },
    #[error("taxonomy entry {label:?} references unknown {kind} {reference:?}")]
    UnknownReference {
        label: String,
        reference: String,
        kind: ReferenceKind,
    },
}

/// Loading options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyOptions {
    /// Label assigned to tree node `"0"` and used as the closure root.
    pub root_label: String,
    /// Reject child/descendant references to labels with no entry.
    pub strict_references: bool,
}

impl Default for TaxonomyOptions {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            strict_references: false,
        }
    }
}

/// One entry as written in the configuration: every key optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaxonomyEntry {
    pub children: Option<Vec<String>>,
    pub descendants: Option<Vec<String>>,
    pub deep_descendants: Option<Vec<String>>,
    pub vector: Option<Vec3>,
    pub take_best: Option<bool>,
    pub clustering_endnode: Option<bool>,
    /// Display hint, passed through to the output tree unchanged.
    pub color: Option<serde_json::Value>,
}

/// One anatomical label's rule, with all defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyEntry {
    pub name: String,
    /// Labels assignable to a node's immediate successors, in config order.
    pub children: Vec<String>,
    /// Labels that must appear in the strict subtree below this label.
    pub descendants: BTreeSet<String>,
    /// Transitive closure of `descendants` through `children`.
    pub deep_descendants: BTreeSet<String>,
    pub vector: Option<Vec3>,
    pub take_best: bool,
    pub clustering_endnode: bool,
    pub color: Option<serde_json::Value>,
    /// `deep_descendants` as written in the config; seeds the closure.
    declared_deep: BTreeSet<String>,
}

impl RawTaxonomyEntry {
    /// Back-fill missing keys with empty/false values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BadVector`] if `vector` is zero-length or
    /// not finite.
    pub fn apply_defaults(self, name: &str) -> Result<TaxonomyEntry, ConfigError> {
        if let Some(vector) = self.vector {
            if !is_usable_direction(vector) {
                return Err(ConfigError::BadVector {
                    label: name.to_string(),
                    vector,
                });
            }
        }
        let declared_deep: BTreeSet<String> =
            self.deep_descendants.unwrap_or_default().into_iter().collect();
        Ok(TaxonomyEntry {
            name: name.to_string(),
            children: self.children.unwrap_or_default(),
            descendants: self.descendants.unwrap_or_default().into_iter().collect(),
            deep_descendants: declared_deep.clone(),
            vector: self.vector,
            take_best: self.take_best.unwrap_or(false),
            clustering_endnode: self.clustering_endnode.unwrap_or(false),
            color: self.color,
            declared_deep,
        })
    }
}

/// Apply defaults to every raw entry.
///
/// # Errors
///
/// Propagates the first [`ConfigError`] from [`RawTaxonomyEntry::apply_defaults`].
pub fn apply_defaults(
    raw: BTreeMap<String, RawTaxonomyEntry>,
) -> Result<BTreeMap<String, TaxonomyEntry>, ConfigError> {
    raw.into_iter()
        .map(|(name, entry)| {
            let entry = entry.apply_defaults(&name)?;
            Ok((name, entry))
        })
        .collect()
}

/// The loaded rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    entries: BTreeMap<String, TaxonomyEntry>,
    root_label: String,
}

impl Taxonomy {
    /// Parse a JSON5 (or JSON) taxonomy document.
    ///
    /// An entry may be `null` or `{}` when it only names a terminal label.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document or any entry cannot be parsed,
    /// a vector is unusable, the root label is missing, or (in strict mode)
    /// an entry references an unknown label.
    pub fn load(text: &str, options: &TaxonomyOptions) -> Result<Self, ConfigError> {
        let document: serde_json::Value =
            json5::from_str(text).map_err(|e| ConfigError::Syntax {
                detail: e.to_string(),
            })?;
        let serde_json::Value::Object(map) = document else {
            return Err(ConfigError::NotAMapping);
        };

        let mut raw = BTreeMap::new();
        for (label, value) in map {
            let entry = if value.is_null() {
                RawTaxonomyEntry::default()
            } else {
                serde_json::from_value(value).map_err(|e| ConfigError::Entry {
                    label: label.clone(),
                    detail: e.to_string(),
                })?
            };
            raw.insert(label, entry);
        }
        Self::from_raw(raw, options)
    }

    /// Read and parse a taxonomy file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Taxonomy::load`].
    pub fn from_path(path: &Path, options: &TaxonomyOptions) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&text, options)
    }

    /// Build from already-deserialized raw entries.
    ///
    /// # Errors
    ///
    /// As [`Taxonomy::load`], minus syntax errors.
    pub fn from_raw(
        raw: BTreeMap<String, RawTaxonomyEntry>,
        options: &TaxonomyOptions,
    ) -> Result<Self, ConfigError> {
        let entries = apply_defaults(raw)?;
        if !entries.contains_key(&options.root_label) {
            return Err(ConfigError::MissingRoot {
                label: options.root_label.clone(),
            });
        }
        let mut taxonomy = Self {
            entries,
            root_label: options.root_label.clone(),
        };
        if options.strict_references {
            if let Some((label, reference, kind)) = taxonomy.unknown_references().into_iter().next()
            {
                return Err(ConfigError::UnknownReference {
                    label,
                    reference,
                    kind,
                });
            }
        }
        taxonomy.compute_deep_descendants();
        log::debug!(
            "loaded taxonomy with {} labels rooted at {:?}",
            taxonomy.len(),
            taxonomy.root_label
        );
        Ok(taxonomy)
    }

    /// Recompute every entry's `deep_descendants` from the root label.
    ///
    /// `deep(L) = declared(L) ∪ descendants(L) ∪ ⋃ deep(c), c ∈ children(L)`.
    /// Unknown child labels contribute nothing. Entries unreachable from the
    /// root keep only their declared closure. A cycle in the children graph
    /// is cut at the repeated label. Running this twice yields the same
    /// closure.
    pub fn compute_deep_descendants(&mut self) {
        let mut memo: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut in_progress: BTreeSet<String> = BTreeSet::new();
        let root = self.root_label.clone();
        deep_closure(&self.entries, &root, &mut memo, &mut in_progress);

        for (label, entry) in &mut self.entries {
            entry.deep_descendants = memo
                .remove(label)
                .unwrap_or_else(|| entry.declared_deep.clone());
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&TaxonomyEntry> {
        self.entries.get(label)
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    #[must_use]
    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    /// All labels in lexicographic order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TaxonomyEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `deep_descendants` of `label`, `None` for unknown labels.
    #[must_use]
    pub fn deep_descendants(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(label).map(|e| &e.deep_descendants)
    }

    /// Labels marked as terminal units for downstream clustering.
    #[must_use]
    pub fn clustering_endnodes(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .filter(|e| e.clustering_endnode)
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Every `(label, reference, kind)` naming a label with no entry.
    #[must_use]
    pub fn unknown_references(&self) -> Vec<(String, String, ReferenceKind)> {
        let mut unknown = Vec::new();
        for entry in self.entries.values() {
            let children = entry.children.iter().map(|c| (c, ReferenceKind::Child));
            let descendants = entry
                .descendants
                .iter()
                .map(|d| (d, ReferenceKind::Descendant));
            for (reference, kind) in children.chain(descendants) {
                if !self.entries.contains_key(reference) {
                    unknown.push((entry.name.clone(), reference.clone(), kind));
                }
            }
        }
        unknown
    }

    /// JSON projection of the defaulted taxonomy, used for digests.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .values()
            .map(|e| {
                let value = serde_json::json!({
                    "children": e.children,
                    "descendants": e.descendants,
                    "deep_descendants": e.deep_descendants,
                    "vector": e.vector,
                    "take_best": e.take_best,
                    "clustering_endnode": e.clustering_endnode,
                    "color": e.color,
                });
                (e.name.clone(), value)
            })
            .collect();
        serde_json::json!({
            "root_label": self.root_label,
            "entries": map,
        })
    }
}

fn deep_closure(
    entries: &BTreeMap<String, TaxonomyEntry>,
    label: &str,
    memo: &mut BTreeMap<String, BTreeSet<String>>,
    in_progress: &mut BTreeSet<String>,
) -> BTreeSet<String> {
    if let Some(done) = memo.get(label) {
        return done.clone();
    }
    let Some(entry) = entries.get(label) else {
        return BTreeSet::new();
    };
    if !in_progress.insert(label.to_string()) {
        log::warn!("taxonomy children graph has a cycle through {label:?}; cutting it");
        return BTreeSet::new();
    }

    let mut closure = entry.declared_deep.clone();
    closure.extend(entry.descendants.iter().cloned());
    for child in &entry.children {
        closure.extend(deep_closure(entries, child, memo, in_progress));
    }

    in_progress.remove(label);
    memo.insert(label.to_string(), closure.clone());
    closure
}
