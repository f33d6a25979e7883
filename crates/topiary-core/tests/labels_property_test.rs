//! Property tests for label remapping.

use std::collections::BTreeMap;

use proptest::prelude::*;
use topiary_core::models::labels::*;

proptest! {
    #[test]
    fn prop_remap_is_dense(labels in prop::collection::vec(-3i32..40, 0..200)) {
        let out = remap_dense(&labels);
        prop_assert_eq!(out.len(), labels.len());
        prop_assert!(is_dense(&out));
        prop_assert_eq!(cluster_count(&out), cluster_count(&labels));
        prop_assert_eq!(noise_count(&out), noise_count(&labels));
    }

    #[test]
    fn prop_remap_preserves_membership(labels in prop::collection::vec(-1i32..15, 0..120)) {
        let out = remap_dense(&labels);
        for i in 0..labels.len() {
            for j in 0..labels.len() {
                if !is_noise(labels[i]) && !is_noise(labels[j]) {
                    prop_assert_eq!(labels[i] == labels[j], out[i] == out[j]);
                }
            }
        }
    }

    #[test]
    fn prop_mapping_never_increases_cluster_count(
        labels in prop::collection::vec(-1i32..10, 0..100),
        rules in prop::collection::vec((0i32..10, 0i32..10), 0..6),
    ) {
        let mapping: BTreeMap<_, _> = rules.into_iter().collect();
        let out = apply_mapping(&labels, &mapping);
        prop_assert!(is_dense(&out));
        prop_assert!(cluster_count(&out) <= cluster_count(&labels));
        prop_assert_eq!(noise_count(&out), noise_count(&labels));
    }
}
