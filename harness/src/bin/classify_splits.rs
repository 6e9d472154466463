//! `classify-splits OUTPUT_DIR INPUT_DIR`: classify one patient's split tree.
//!
//! Exit status is 0 whenever a classified tree was written, including the
//! invalid fallback (a diagnostic goes to stderr). Configuration, input and
//! write failures exit with 1.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use airway_harness::{load_taxonomy, run_patient, HarnessError};
use airway_kernel::taxonomy::{TaxonomyOptions, DEFAULT_ROOT_LABEL};
use airway_search::{SearchPolicy, VectorRule};

#[derive(Parser, Debug)]
#[command(
    name = "classify-splits",
    version,
    about = "Label every split of an extracted airway tree"
)]
struct Args {
    /// Directory the classified tree and report are written to
    output_dir: PathBuf,

    /// Directory containing the extracted tree.json
    input_dir: PathBuf,

    /// Taxonomy configuration (JSON5)
    #[arg(long, default_value = "configs/classification.json5")]
    taxonomy: PathBuf,

    /// Label assigned to the root split
    #[arg(long, default_value = DEFAULT_ROOT_LABEL)]
    root_label: String,

    /// Reject taxonomy references to labels that have no entry
    #[arg(long)]
    strict_references: bool,

    /// Worklist expansions before the search gives up
    #[arg(long)]
    max_expansions: Option<u64>,

    /// Frontier size above which the most expensive states are dropped
    #[arg(long)]
    max_frontier_size: Option<usize>,

    /// Distinct permutations tried per split before enumeration stops
    #[arg(long)]
    max_permutations_per_node: Option<u64>,

    /// When permutations are compared by direction: all|any
    #[arg(long, default_value_t = VectorRule::All)]
    vector_rule: VectorRule,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn policy(&self) -> SearchPolicy {
        let defaults = SearchPolicy::default();
        SearchPolicy {
            max_expansions: self.max_expansions.unwrap_or(defaults.max_expansions),
            max_frontier_size: self.max_frontier_size.unwrap_or(defaults.max_frontier_size),
            max_permutations_per_node: self
                .max_permutations_per_node
                .unwrap_or(defaults.max_permutations_per_node),
            vector_rule: self.vector_rule,
            ..defaults
        }
    }
}

fn run(args: &Args) -> Result<bool, HarnessError> {
    let options = TaxonomyOptions {
        root_label: args.root_label.clone(),
        strict_references: args.strict_references,
    };
    let taxonomy = load_taxonomy(&args.taxonomy, &options)?;
    let outcome = run_patient(&args.output_dir, &args.input_dir, &taxonomy, &args.policy())?;
    Ok(outcome.report.valid)
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = SimpleLogger::new().with_level(args.level()).init() {
        eprintln!("warning: logger already initialised: {e}");
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!(
                "ERROR: could not create a valid tree for {}; wrote the cheapest invalid tree instead",
                args.input_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
