//! Airway search: best-first classification of split trees.
//!
//! This crate provides the search layer. It depends only on
//! `airway_kernel`; it does NOT depend on `airway_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! airway_kernel  ←  airway_search  ←  airway_harness
//! (taxonomy, tree)   (permutations,     (files, reports, CLI)
//!                     frontier)
//! ```
//!
//! # Key types
//!
//! - [`permutation::PermutationSet`] -- scored label assignments for one node
//! - [`state::SearchState`] -- a tree snapshot plus its worklist
//! - [`frontier::BestFirstFrontier`] -- cheapest-first state queue
//! - [`SearchPolicy`] -- budgets and the vector rule
//! - [`Classification`] -- the chosen tree and how it was found

#![forbid(unsafe_code)]

pub mod error;
pub mod frontier;
pub mod permutation;
pub mod policy;
pub mod search;
pub mod select;
pub mod state;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::SearchError;
pub use policy::{SearchPolicy, VectorRule};
pub use search::{search, ExpandEvent, SearchResult, TerminationReason};
pub use select::{classify, finalize_costs, Classification};
pub use stats::{AngleSummary, SearchStats};
