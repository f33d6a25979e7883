//! Density clustering: DBSCAN (default) or HDBSCAN over an embedding matrix.
//!
//! Never raises on degenerate input: fewer than 2 points, or every point
//! sitting on the same coordinates, yields all-noise. Shape problems are
//! still reported as `InputShapeError`.

pub mod dbscan_backend;
pub mod hdbscan_backend;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use topiary_core::config::{DensityAlgorithm, DensityConfig};
use topiary_core::errors::{ClusteringError, TopiaryResult};
use topiary_core::models::labels;
use topiary_core::{ClusterLabel, NOISE};
use tracing::{info, warn};

use crate::algorithms::similarity;

/// Counts describing one labelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub n_points: usize,
    pub n_clusters: usize,
    pub n_noise: usize,
    /// Members per cluster label.
    pub sizes: BTreeMap<ClusterLabel, usize>,
}

impl ClusterSummary {
    pub fn from_labels(labels: &[ClusterLabel]) -> Self {
        let sizes: BTreeMap<ClusterLabel, usize> = labels::group_indices(labels)
            .into_iter()
            .map(|(label, members)| (label, members.len()))
            .collect();
        Self {
            n_points: labels.len(),
            n_clusters: sizes.len(),
            n_noise: labels::noise_count(labels),
            sizes,
        }
    }

    /// Size of the largest cluster, 0 when everything is noise.
    pub fn largest(&self) -> usize {
        self.sizes.values().copied().max().unwrap_or(0)
    }
}

/// Configured density clusterer. Pure: no state survives a call.
#[derive(Debug, Clone)]
pub struct DensityClusterer {
    config: DensityConfig,
}

impl DensityClusterer {
    pub fn new(config: DensityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DensityConfig {
        &self.config
    }

    /// One label per row. Labels are dense `0..k-1`; noise is [`NOISE`].
    pub fn cluster(&self, embeddings: &[Vec<f32>]) -> TopiaryResult<Vec<ClusterLabel>> {
        similarity::validate_matrix(embeddings)?;
        let n = embeddings.len();
        if n < 2 || all_identical(embeddings) {
            warn!(points = n, "degenerate density input, labelling all points as noise");
            return Ok(vec![NOISE; n]);
        }

        let result = match self.config.algorithm {
            DensityAlgorithm::Dbscan => dbscan_backend::cluster(
                embeddings,
                self.config.eps,
                self.config.min_samples,
                self.config.metric,
            ),
            DensityAlgorithm::Hdbscan => hdbscan_backend::cluster(
                embeddings,
                self.config.min_cluster_size,
                self.config.min_samples,
                self.config.metric,
            ),
        };
        let labels = match result {
            Ok(labels) => labels,
            Err(ClusteringError::BackendFailed { reason }) => {
                warn!(
                    algorithm = ?self.config.algorithm,
                    points = n,
                    %reason,
                    "density backend failed, labelling all points as noise"
                );
                return Ok(vec![NOISE; n]);
            }
            Err(e) => return Err(e.into()),
        };
        let labels = labels::remap_dense(&labels);

        let summary = ClusterSummary::from_labels(&labels);
        info!(
            algorithm = ?self.config.algorithm,
            points = n,
            clusters = summary.n_clusters,
            noise = summary.n_noise,
            "density clustering complete"
        );
        Ok(labels)
    }
}

fn all_identical(embeddings: &[Vec<f32>]) -> bool {
    match embeddings.split_first() {
        Some((first, rest)) => rest.iter().all(|row| row == first),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topiary_core::config::DistanceMetric;

    fn config(eps: f64, min_samples: usize) -> DensityConfig {
        DensityConfig {
            eps,
            min_samples,
            metric: DistanceMetric::Euclidean,
            ..DensityConfig::default()
        }
    }

    #[test]
    fn single_point_is_noise() {
        let labels = DensityClusterer::new(config(1.0, 1))
            .cluster(&[vec![1.0, 2.0]])
            .unwrap();
        assert_eq!(labels, vec![NOISE]);
    }

    #[test]
    fn identical_points_are_noise() {
        let rows = vec![vec![0.5, 0.5]; 6];
        let labels = DensityClusterer::new(config(1.0, 2)).cluster(&rows).unwrap();
        assert!(labels.iter().all(|&l| l == NOISE));
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(DensityClusterer::new(config(1.0, 2)).cluster(&rows).is_err());
    }

    #[test]
    fn backend_failure_degrades_to_noise() {
        let rows = vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![5.0, 5.0]];
        let labels = DensityClusterer::new(config(1.0, 1)).cluster(&rows).unwrap();
        assert_eq!(labels, vec![NOISE; 3]);
    }

    #[test]
    fn two_groups_and_an_outlier() {
        let rows = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![20.0, -20.0],
        ];
        let labels = DensityClusterer::new(config(0.5, 3)).cluster(&rows).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1, NOISE]);
        let summary = ClusterSummary::from_labels(&labels);
        assert_eq!(summary.n_clusters, 2);
        assert_eq!(summary.n_noise, 1);
        assert_eq!(summary.largest(), 3);
    }
}
