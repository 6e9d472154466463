//! Harness errors: everything that stops a patient run before a tree is
//! written.

use std::path::PathBuf;

use thiserror::Error;

use airway_kernel::taxonomy::ConfigError;
use airway_kernel::tree::TreeError;
use airway_search::SearchError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed tree document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },
}
