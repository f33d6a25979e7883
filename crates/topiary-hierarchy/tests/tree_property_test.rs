//! Property tests for dendrogram cuts and tree serialisation.

use proptest::prelude::*;

use topiary_core::config::Linkage;
use topiary_hierarchy::{Dendrogram, TopicTree};

fn linkage() -> impl Strategy<Value = Linkage> {
    prop_oneof![
        Just(Linkage::Average),
        Just(Linkage::Complete),
        Just(Linkage::Single),
        Just(Linkage::Ward),
    ]
}

fn medoids() -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(0.1f32..1.0, 4), 2..9)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn higher_cuts_nest_lower_ones(points in medoids(), linkage in linkage()) {
        let dendrogram = Dendrogram::from_medoids(&points, linkage).unwrap();
        prop_assert_eq!(dendrogram.roots().len(), 1);

        let table = dendrogram.cut_table(&dendrogram.auto_thresholds(6));
        for pair in table.rows().windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            prop_assert!(upper.n_groups < lower.n_groups);
            for i in 0..points.len() {
                for j in 0..points.len() {
                    if lower.labels[i] == lower.labels[j] {
                        prop_assert_eq!(upper.labels[i], upper.labels[j]);
                    }
                }
            }
        }
    }

    #[test]
    fn tree_keeps_every_leaf_and_round_trips(points in medoids(), linkage in linkage()) {
        let dendrogram = Dendrogram::from_medoids(&points, linkage).unwrap();
        let table = dendrogram.cut_table(&dendrogram.auto_thresholds(4));
        let tree = TopicTree::from_cut_table(&table, &Default::default()).unwrap();
        prop_assert_eq!(tree.leaf_count(), points.len());

        let rebuilt = TopicTree::from_parent_links(
            &tree.parent_links(),
            &tree.summaries(),
            &Default::default(),
        )
        .unwrap();
        prop_assert_eq!(&rebuilt, &tree);
        prop_assert_eq!(TopicTree::from_json(&tree.to_json().unwrap()).unwrap(), tree);
    }
}
