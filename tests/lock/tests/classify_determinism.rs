//! In-process determinism: repeated classification of the same input yields
//! byte-identical output documents and identical counters.

use airway_harness::classify_document;
use airway_harness::synthetic::{ideal_tree, SyntheticOptions};
use airway_kernel::digest::canon::to_canonical_json_bytes;
use airway_search::{SearchPolicy, VectorRule};
use lock_tests::fixtures::{document, random_tree, shipped_taxonomy, taxonomy, Lcg};

#[test]
fn shipped_synthetic_tree_classifies_identically() {
    let tax = shipped_taxonomy();
    let synthetic = ideal_tree(
        &tax,
        &SyntheticOptions {
            twig_per_endnode: true,
            ..SyntheticOptions::default()
        },
    );
    let policy = SearchPolicy {
        record_trace: true,
        ..SearchPolicy::default()
    };

    let a = classify_document(&tax, synthetic.document.clone(), &policy).unwrap();
    let b = classify_document(&tax, synthetic.document, &policy).unwrap();

    assert_eq!(
        to_canonical_json_bytes(&a.tree.to_document()).unwrap(),
        to_canonical_json_bytes(&b.tree.to_document()).unwrap()
    );
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.trace, b.trace);
    assert_eq!(a.cost.to_bits(), b.cost.to_bits());
}

#[test]
fn ambiguous_ties_resolve_the_same_way_every_time() {
    // No vectors anywhere: every permutation is a tie.
    let tax = taxonomy(
        r#"{
            Trachea: { children: ["A", "B", "C"] },
            A: { children: ["A1", "A2"] },
            B: { children: ["B1"] },
            C: {},
            A1: {}, A2: {}, B1: {},
        }"#,
    );
    let mut rng = Lcg::new(7);
    for _ in 0..20 {
        let (positions, edges) = random_tree(&mut rng, 3, 3);
        let doc = document(&positions, &edges);
        for rule in [VectorRule::All, VectorRule::Any] {
            let policy = SearchPolicy {
                vector_rule: rule,
                ..SearchPolicy::default()
            };
            let first = classify_document(&tax, doc.clone(), &policy).unwrap();
            for _ in 0..3 {
                let again = classify_document(&tax, doc.clone(), &policy).unwrap();
                assert_eq!(first.tree.all_labels(), again.tree.all_labels());
            }
        }
    }
}
