//! HDBSCAN via the `hdbscan` crate.
//!
//! The crate measures Euclidean distance, so cosine is realised by
//! L2-normalising rows first. Backend errors surface as
//! `ClusteringError::BackendFailed`.

use hdbscan::{Hdbscan, HdbscanHyperParams};
use topiary_core::config::DistanceMetric;
use topiary_core::errors::ClusteringError;
use topiary_core::{ClusterLabel, NOISE};

use crate::algorithms::similarity;

pub fn cluster(
    points: &[Vec<f32>],
    min_cluster_size: usize,
    min_samples: usize,
    metric: DistanceMetric,
) -> Result<Vec<ClusterLabel>, ClusteringError> {
    if points.len() < min_cluster_size.max(2) {
        return Ok(vec![NOISE; points.len()]);
    }

    let data: Vec<Vec<f32>> = match metric {
        DistanceMetric::Cosine => points.iter().map(|p| similarity::l2_normalize(p)).collect(),
        DistanceMetric::Euclidean => points.to_vec(),
    };

    let hyper_params = HdbscanHyperParams::builder()
        .min_cluster_size(min_cluster_size)
        .min_samples(min_samples)
        .build();

    let labels = Hdbscan::new(&data, hyper_params)
        .cluster()
        .map_err(|e| ClusteringError::BackendFailed {
            reason: format!("hdbscan: {e:?}"),
        })?;
    Ok(labels
        .into_iter()
        .map(|l| if l < 0 { NOISE } else { l })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points_is_noise() {
        let labels =
            cluster(&[vec![1.0, 0.0], vec![0.0, 1.0]], 5, 2, DistanceMetric::Euclidean).unwrap();
        assert_eq!(labels, vec![NOISE, NOISE]);
    }

    #[test]
    fn output_is_aligned_with_input() {
        let mut rows = Vec::new();
        for i in 0..8 {
            rows.push(vec![0.0 + i as f32 * 0.01, 0.0]);
            rows.push(vec![10.0 + i as f32 * 0.01, 10.0]);
        }
        let labels = cluster(&rows, 3, 2, DistanceMetric::Euclidean).unwrap();
        assert_eq!(labels.len(), rows.len());
        // Rows alternate between the two blobs.
        for pair in labels.chunks(2) {
            if pair[0] >= 0 && pair[1] >= 0 {
                assert_ne!(pair[0], pair[1]);
            }
        }
    }
}
