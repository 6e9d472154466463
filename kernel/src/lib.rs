//! Airway kernel: the data model of the split classifier.
//!
//! # Modules
//!
//! - [`taxonomy`] -- anatomical rule set, defaults and deep-descendant closure
//! - [`tree`] -- extracted split tree with copy-on-branch labels and costs
//! - [`geometry`] -- direction vectors and the angular cost function
//! - [`validity`] -- global uniqueness and descendant-satisfaction checks
//! - [`digest`] -- canonical JSON and content hashes for reports
//!
//! # Module Dependency Direction
//!
//! `geometry` ← `taxonomy` ← `tree` ← `validity`
//!
//! `digest` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod digest;
pub mod geometry;
pub mod taxonomy;
pub mod tree;
pub mod validity;
