//! End-to-end scenarios: the two-sided example without vectors, the
//! unreachable-descendant fallback, and the expansion budget.

use airway_search::{classify, SearchPolicy, TerminationReason};
use airway_kernel::validity::Violation;
use lock_tests::fixtures::{taxonomy, tree};

fn forked() -> airway_kernel::tree::LabeledTree {
    tree(
        &[
            [0.0, 0.0, 0.0],
            [0.0, 0.0, -10.0],
            [-4.0, 1.0, -14.0],
            [4.0, -1.0, -14.0],
        ],
        &[(0, 1), (1, 2), (1, 3)],
    )
}

#[test]
fn example_without_vectors_takes_first_enumerated_permutation() {
    let tax = taxonomy(
        r#"{
            Trachea: { children: ["Bronchus"], take_best: true },
            Bronchus: { children: ["L", "R"], descendants: [] },
        }"#,
    );
    let c = classify(&tax, forked(), &SearchPolicy::default()).unwrap();
    assert!(c.valid);
    assert_eq!(c.tree.label(1), "Bronchus");
    assert_eq!(c.tree.label(2), "L");
    assert_eq!(c.tree.label(3), "R");
    assert!(c.tree.unclassified_nodes().is_empty());
}

#[test]
fn unreachable_descendant_yields_cheapest_invalid_tree() {
    let tax = taxonomy(
        r#"{
            Trachea: { children: ["Bronchus"], take_best: true },
            Bronchus: { children: ["L", "R", "M"], descendants: ["L", "R", "M"] },
        }"#,
    );
    let c = classify(&tax, forked(), &SearchPolicy::default()).unwrap();
    assert!(!c.valid);
    assert_eq!(c.termination, TerminationReason::FrontierExhausted);
    match c.violation {
        Some(Violation::UnsatisfiedDescendant { label, missing, .. }) => {
            assert_eq!(label, "Bronchus");
            assert_eq!(missing.into_iter().collect::<Vec<_>>(), vec!["M".to_string()]);
        }
        other => panic!("unexpected violation {other:?}"),
    }
    assert_eq!(c.tree.label(1), "Bronchus");
    assert_eq!(c.tree.len(), 4);
}

#[test]
fn tiny_budget_still_returns_a_tree() {
    let tax = taxonomy(
        r#"{
            Trachea: { children: ["Bronchus"] },
            Bronchus: { children: ["L", "R"], vector: [0, 0, -1] },
            L: { vector: [1, 0, -1] },
            R: { vector: [-1, 0, -1] },
        }"#,
    );
    let policy = SearchPolicy {
        max_expansions: 2,
        ..SearchPolicy::default()
    };
    let c = classify(&tax, forked(), &policy).unwrap();
    assert!(!c.valid);
    assert_eq!(c.termination, TerminationReason::ExpansionBudgetExceeded);
    assert_eq!(c.stats.expansions, 2);
    assert_eq!(c.tree.label(1), "Bronchus");
}

#[test]
fn frontier_cap_prunes_but_search_completes() {
    let tax = taxonomy(
        r#"{
            Trachea: { children: ["Bronchus"] },
            Bronchus: { children: ["L", "R"], vector: [0, 0, -1] },
            L: { vector: [1, 0, -1] },
            R: { vector: [-1, 0, -1] },
        }"#,
    );
    let policy = SearchPolicy {
        max_frontier_size: 1,
        ..SearchPolicy::default()
    };
    let c = classify(&tax, forked(), &policy).unwrap();
    assert!(c.valid);
    assert_eq!(c.tree.label(2), "R");
    assert!(c.stats.states_pruned >= 1);
    assert_eq!(c.stats.frontier_high_water, 2);
}
