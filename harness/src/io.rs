//! File layout of one patient directory and the readers/writers for it.
//!
//! ```text
//! <input_dir>/tree.json                     extracted split tree
//! <output_dir>/tree.json                    classified split tree
//! <output_dir>/classification_report.json   report
//! ```

use std::path::Path;

use serde::Serialize;

use airway_kernel::tree::TreeDocument;

use crate::error::HarnessError;

pub const TREE_FILENAME: &str = "tree.json";
pub const REPORT_FILENAME: &str = "classification_report.json";

/// Read and parse `<dir>/tree.json`.
///
/// # Errors
///
/// Returns [`HarnessError::Read`] or [`HarnessError::Document`].
pub fn read_tree_document(dir: &Path) -> Result<TreeDocument, HarnessError> {
    let path = dir.join(TREE_FILENAME);
    let bytes = std::fs::read(&path).map_err(|source| HarnessError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| HarnessError::Document { path, source })
}

/// Write `value` as pretty JSON, atomically.
///
/// # Errors
///
/// Returns [`HarnessError::Serialize`] or [`HarnessError::Write`].
pub fn write_json<T: Serialize>(
    path: &Path,
    what: &'static str,
    value: &T,
) -> Result<(), HarnessError> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|source| HarnessError::Serialize { what, source })?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)
}

/// Write bytes to a path via temp file + rename (best-effort atomicity on Unix).
/// The temp file is removed again if the rename fails.
///
/// # Errors
///
/// Returns [`HarnessError::Write`] naming the path that failed.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), HarnessError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp_name = format!(
        ".tmp_{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = dir.join(temp_name);

    std::fs::write(&temp_path, content).map_err(|source| HarnessError::Write {
        path: temp_path.clone(),
        source,
    })?;
    std::fs::rename(&temp_path, path).map_err(|source| {
        if let Err(e) = std::fs::remove_file(&temp_path) {
            log::warn!("could not remove {}: {e}", temp_path.display());
        }
        HarnessError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}
