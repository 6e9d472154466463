//! The shipped taxonomy: it lints clean, and its own ideal tree, with or
//! without noise and extra twigs, is recovered exactly.

use airway_harness::classify_document;
use airway_harness::synthetic::{ideal_tree, SyntheticOptions, SyntheticTree};
use airway_kernel::taxonomy::{Taxonomy, TaxonomyOptions};
use airway_kernel::tree::{EdgeRecord, LabeledTree};
use airway_search::SearchPolicy;
use lock_tests::fixtures::{shipped_taxonomy, shipped_taxonomy_path, Lcg};

fn assert_recovered(tree: &LabeledTree, synthetic: &SyntheticTree) {
    for (id, expected) in &synthetic.expected {
        let ix = tree.node_index(id).unwrap();
        match expected {
            Some(label) => assert_eq!(tree.label(ix), label.as_str(), "node {id}"),
            None => assert!(tree.is_placeholder(ix), "node {id} got {}", tree.label(ix)),
        }
    }
}

#[test]
fn shipped_taxonomy_lints_clean() {
    let tax = shipped_taxonomy();
    let warnings = tax.lint();
    assert!(warnings.is_empty(), "{warnings:?}");
}

#[test]
fn shipped_taxonomy_loads_strictly() {
    let options = TaxonomyOptions {
        strict_references: true,
        ..TaxonomyOptions::default()
    };
    let tax = Taxonomy::from_path(&shipped_taxonomy_path(), &options).unwrap();
    assert_eq!(tax.root_label(), "Trachea");
    assert_eq!(tax.clustering_endnodes().len(), 19);
}

#[test]
fn ideal_tree_is_recovered_exactly() {
    let tax = shipped_taxonomy();
    let synthetic = ideal_tree(&tax, &SyntheticOptions::default());
    let c = classify_document(&tax, synthetic.document.clone(), &SearchPolicy::default()).unwrap();
    assert!(c.valid);
    assert!(c.cost < 1e-4, "ideal tree should cost ~0, got {}", c.cost);
    assert_eq!(c.stats.trees_discarded, 0);
    assert_recovered(&c.tree, &synthetic);
}

#[test]
fn twigs_stay_unclassified() {
    let tax = shipped_taxonomy();
    let synthetic = ideal_tree(
        &tax,
        &SyntheticOptions {
            twig_per_endnode: true,
            ..SyntheticOptions::default()
        },
    );
    let c = classify_document(&tax, synthetic.document.clone(), &SearchPolicy::default()).unwrap();
    assert!(c.valid);
    assert_eq!(c.tree.unclassified_nodes().len(), 19);
    assert_recovered(&c.tree, &synthetic);
}

#[test]
fn twig_under_a_lobe_leaves_its_branches_classified() {
    let tax = shipped_taxonomy();
    let mut synthetic = ideal_tree(&tax, &SyntheticOptions::default());
    let lobe = synthetic
        .expected
        .iter()
        .find(|(_, label)| label.as_deref() == Some("RUpperLobe"))
        .map(|(id, _)| id.clone())
        .unwrap();
    let mut twig = synthetic
        .document
        .nodes
        .iter()
        .find(|n| n.id == lobe)
        .cloned()
        .unwrap();
    twig.id = "twig".to_string();
    // Carry on in the lobe's own direction, past its split.
    twig.x -= 4.0;
    twig.z += 2.0;
    synthetic.document.nodes.push(twig);

    // Listed before the lobe's real branches.
    let first = synthetic
        .document
        .edges
        .iter()
        .position(|e| e.source == lobe)
        .unwrap();
    synthetic.document.edges.insert(
        first,
        EdgeRecord {
            source: lobe.clone(),
            target: "twig".to_string(),
            attributes: serde_json::Map::new(),
        },
    );
    synthetic.expected.insert("twig".to_string(), None);

    let c = classify_document(&tax, synthetic.document.clone(), &SearchPolicy::default()).unwrap();
    assert!(c.valid);
    assert!(c.cost < 1e-4, "lobe branches should still match, got {}", c.cost);
    assert_recovered(&c.tree, &synthetic);
}

#[test]
fn noisy_tree_is_recovered() {
    let tax = shipped_taxonomy();
    for seed in 0..10 {
        let mut synthetic = ideal_tree(&tax, &SyntheticOptions::default());
        let mut rng = Lcg::new(seed);
        for node in synthetic.document.nodes.iter_mut().skip(1) {
            node.x += 0.3 * rng.unit();
            node.y += 0.3 * rng.unit();
            node.z += 0.3 * rng.unit();
        }
        let c = classify_document(&tax, synthetic.document.clone(), &SearchPolicy::default())
            .unwrap();
        assert!(c.valid, "seed {seed}");
        assert_recovered(&c.tree, &synthetic);
    }
}
