//! Binary that classifies the synthetic tree of the shipped taxonomy and
//! prints deterministic output lines for cross-process verification.
//!
//! Usage: `classify_fixture`
//!
//! Output: key=value lines (see source for format).

use airway_harness::report::ClassificationReport;
use airway_harness::synthetic::{ideal_tree, SyntheticOptions};
use airway_harness::classify_document;
use airway_search::SearchPolicy;
use lock_tests::fixtures::shipped_taxonomy;

fn main() {
    let taxonomy = shipped_taxonomy();
    let options = SyntheticOptions {
        twig_per_endnode: true,
        ..SyntheticOptions::default()
    };
    let synthetic = ideal_tree(&taxonomy, &options);
    let policy = SearchPolicy::default();
    let classification = classify_document(&taxonomy, synthetic.document.clone(), &policy)
        .expect("classification failed");
    let report = ClassificationReport::build(&taxonomy, &synthetic.document, &classification)
        .expect("report failed");

    println!("taxonomy_digest={}", report.taxonomy_digest);
    println!("input_digest={}", report.input_digest);
    println!("output_digest={}", report.output_digest);
    println!("valid={}", report.valid);
    println!("termination={}", report.termination);
    println!("search_cost={:.12}", report.search_cost);
    println!("expansions={}", report.stats.expansions);
    println!("states_enqueued={}", report.stats.states_enqueued);
    println!("trees_discarded={}", report.stats.trees_discarded);
    println!("unclassified={}", report.unclassified_nodes.len());
    println!("endnodes_missing={}", report.endnodes_missing.len());
}
