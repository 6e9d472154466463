//! Content digests for taxonomies and tree documents.

pub mod canon;
pub mod hash;
