//! Airway harness: per-patient orchestration around the classifier.
//!
//! The harness reads the extracted tree and the taxonomy, runs
//! `airway_search::classify`, and writes the classified tree plus a report
//! back to disk. It does NOT implement any search logic; it delegates to the
//! search crate.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod io;
pub mod report;
pub mod runner;
pub mod synthetic;

pub use error::HarnessError;
pub use runner::{classify_document, load_taxonomy, run_patient, RunOutcome};
