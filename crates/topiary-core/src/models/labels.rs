//! Cluster labels and the dense remap shared by every relabelling step.

use std::collections::{BTreeMap, BTreeSet};

/// Cluster assignment of one chunk. [`NOISE`] marks unclustered points.
pub type ClusterLabel = i32;

/// Reserved label for points outside every cluster.
pub const NOISE: ClusterLabel = -1;

/// Any negative label counts as noise.
pub fn is_noise(label: ClusterLabel) -> bool {
    label < 0
}

/// Distinct non-noise labels, ascending.
pub fn cluster_ids(labels: &[ClusterLabel]) -> BTreeSet<ClusterLabel> {
    labels.iter().copied().filter(|&l| !is_noise(l)).collect()
}

pub fn cluster_count(labels: &[ClusterLabel]) -> usize {
    cluster_ids(labels).len()
}

pub fn noise_count(labels: &[ClusterLabel]) -> usize {
    labels.iter().filter(|&&l| is_noise(l)).count()
}

/// Member indices per non-noise label.
pub fn group_indices(labels: &[ClusterLabel]) -> BTreeMap<ClusterLabel, Vec<usize>> {
    let mut groups: BTreeMap<ClusterLabel, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in labels.iter().enumerate() {
        if !is_noise(label) {
            groups.entry(label).or_default().push(idx);
        }
    }
    groups
}

/// Relabel non-noise ids to `0..k-1` preserving their ascending order.
/// Negative labels collapse to [`NOISE`].
pub fn remap_dense(labels: &[ClusterLabel]) -> Vec<ClusterLabel> {
    let lookup = dense_lookup(labels);
    labels
        .iter()
        .map(|l| lookup.get(l).copied().unwrap_or(NOISE))
        .collect()
}

/// The old -> dense mapping [`remap_dense`] applies.
pub fn dense_lookup(labels: &[ClusterLabel]) -> BTreeMap<ClusterLabel, ClusterLabel> {
    cluster_ids(labels)
        .into_iter()
        .enumerate()
        .map(|(dense, old)| (old, dense as ClusterLabel))
        .collect()
}

/// Apply an explicit old -> new table, then remap densely.
///
/// Targets share the namespace of the input labels: mapping `3 -> 0` folds
/// cluster 3 into cluster 0. Labels missing from the table keep their id.
/// Mapping a label to a negative value sends its points to noise.
pub fn apply_mapping(
    labels: &[ClusterLabel],
    mapping: &BTreeMap<ClusterLabel, ClusterLabel>,
) -> Vec<ClusterLabel> {
    let grouped: Vec<ClusterLabel> = labels
        .iter()
        .map(|&l| {
            if is_noise(l) {
                return NOISE;
            }
            match mapping.get(&l) {
                Some(&to) if is_noise(to) => NOISE,
                Some(&to) => to,
                None => l,
            }
        })
        .collect();
    remap_dense(&grouped)
}

/// True when the non-noise labels are exactly `0..k-1`.
pub fn is_dense(labels: &[ClusterLabel]) -> bool {
    cluster_ids(labels)
        .into_iter()
        .enumerate()
        .all(|(i, l)| l == i as ClusterLabel)
}
