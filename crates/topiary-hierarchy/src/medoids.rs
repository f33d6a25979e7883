//! Cluster medoids: the member with the smallest summed cosine distance to
//! the rest of its cluster. Ties go to the earliest row.

use std::collections::BTreeMap;

use topiary_clustering::algorithms::similarity;
use topiary_core::models::labels;
use topiary_core::ClusterLabel;

/// Row index of each cluster's medoid, keyed by label.
pub fn medoid_indices(embeddings: &[Vec<f32>], labels: &[ClusterLabel]) -> BTreeMap<ClusterLabel, usize> {
    labels::group_indices(labels)
        .into_iter()
        .filter_map(|(label, members)| medoid_of(embeddings, &members).map(|m| (label, m)))
        .collect()
}

/// Medoid embeddings in ascending label order.
pub fn medoid_vectors(embeddings: &[Vec<f32>], labels: &[ClusterLabel]) -> Vec<Vec<f32>> {
    medoid_indices(embeddings, labels)
        .into_values()
        .map(|i| embeddings[i].clone())
        .collect()
}

fn medoid_of(embeddings: &[Vec<f32>], members: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &i in members {
        let total: f64 = members
            .iter()
            .filter(|&&j| j != i)
            .map(|&j| 1.0 - similarity::cosine_similarity(&embeddings[i], &embeddings[j]))
            .sum();
        if best.map_or(true, |(_, b)| total < b) {
            best = Some((i, total));
        }
    }
    best.map(|(i, _)| i)
}
