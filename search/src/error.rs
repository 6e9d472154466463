//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Runtime terminations
//! (exhaustion, budget) are expressed via
//! [`crate::search::TerminationReason`] and always produce a tree.

use thiserror::Error;

/// Typed failure for pre-flight search validation.
///
/// These errors are returned before search execution begins; no tree is
/// produced because no search steps were taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },
    #[error("root node is labeled {label:?}, which has no taxonomy entry")]
    UnknownRootLabel { label: String },
}
