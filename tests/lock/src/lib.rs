//! Shared fixtures for the lock tests: workspace paths, small tree
//! builders, and an exhaustive reference search.

#![forbid(unsafe_code)]

pub mod reference;
