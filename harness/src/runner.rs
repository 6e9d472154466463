//! Harness runner: one patient in, one classified tree and report out.
//!
//! # Pipeline
//!
//! ```text
//! read_tree_document() → LabeledTree::from_document()
//!   → classify() → ClassificationReport::build()
//!   → write tree.json → write classification_report.json
//! ```
//!
//! An invalid classification is not an error here: the fallback tree is
//! written and the report says `valid: false`.

use std::path::{Path, PathBuf};

use airway_kernel::taxonomy::{Taxonomy, TaxonomyOptions};
use airway_kernel::tree::{LabeledTree, TreeDocument};
use airway_search::{classify, Classification, SearchPolicy};

use crate::error::HarnessError;
use crate::io::{read_tree_document, write_json, REPORT_FILENAME, TREE_FILENAME};
use crate::report::ClassificationReport;

/// What a patient run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: ClassificationReport,
    pub tree_path: PathBuf,
    pub report_path: PathBuf,
}

/// Load a taxonomy file and log any lint findings.
///
/// # Errors
///
/// Returns [`HarnessError::Config`] if the file cannot be read or parsed.
pub fn load_taxonomy(path: &Path, options: &TaxonomyOptions) -> Result<Taxonomy, HarnessError> {
    let taxonomy = Taxonomy::from_path(path, options)?;
    for warning in taxonomy.lint() {
        log::warn!("{}: {warning}", path.display());
    }
    Ok(taxonomy)
}

/// Classify an in-memory tree document.
///
/// # Errors
///
/// Returns [`HarnessError::Tree`] for a structurally broken document and
/// [`HarnessError::Search`] for pre-flight search failures.
pub fn classify_document(
    taxonomy: &Taxonomy,
    document: TreeDocument,
    policy: &SearchPolicy,
) -> Result<Classification, HarnessError> {
    let tree = LabeledTree::from_document(document, taxonomy.root_label())?;
    Ok(classify(taxonomy, tree, policy)?)
}

/// Classify `<input_dir>/tree.json` and write the results to `output_dir`.
///
/// # Errors
///
/// Returns a [`HarnessError`] on unreadable input, a broken tree document,
/// an invalid policy, or a failed write. Never fails because no valid
/// labeling exists.
pub fn run_patient(
    output_dir: &Path,
    input_dir: &Path,
    taxonomy: &Taxonomy,
    policy: &SearchPolicy,
) -> Result<RunOutcome, HarnessError> {
    let input = read_tree_document(input_dir)?;
    log::info!(
        "classifying {} ({} splits)",
        input_dir.display(),
        input.nodes.len()
    );
    let classification = classify_document(taxonomy, input.clone(), policy)?;
    log_branch_vectors(&classification.tree);
    if !classification.valid {
        log::warn!(
            "{}: no valid classification, writing the cheapest invalid tree",
            input_dir.display()
        );
    }

    std::fs::create_dir_all(output_dir).map_err(|source| HarnessError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let tree_path = output_dir.join(TREE_FILENAME);
    write_json(&tree_path, "classified tree", &classification.tree.to_document())?;

    let report = ClassificationReport::build(taxonomy, &input, &classification).map_err(
        |source| HarnessError::Serialize {
            what: "classification report",
            source,
        },
    )?;
    let report_path = output_dir.join(REPORT_FILENAME);
    write_json(&report_path, "classification report", &report)?;

    Ok(RunOutcome {
        report,
        tree_path,
        report_path,
    })
}

fn log_branch_vectors(tree: &LabeledTree) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    for b in tree.branch_vectors() {
        log::debug!(
            "vector {}->{}: {:?} ({} -> {})",
            tree.node_id(b.parent),
            tree.node_id(b.child),
            b.vector,
            tree.label(b.parent),
            tree.label(b.child)
        );
    }
}
