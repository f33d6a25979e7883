use serde::{Deserialize, Serialize};

use super::defaults;

/// Distance used between embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cosine_similarity`.
    #[default]
    Cosine,
    Euclidean,
}

/// Density clustering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DensityAlgorithm {
    /// Fixed-radius DBSCAN driven by `eps` and `min_samples`.
    #[default]
    Dbscan,
    /// Hierarchical DBSCAN driven by `min_cluster_size` and `min_samples`.
    Hdbscan,
}

/// Density clusterer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    pub algorithm: DensityAlgorithm,
    /// Neighbourhood radius (DBSCAN only).
    pub eps: f64,
    /// Neighbours (self included) needed for a core point.
    pub min_samples: usize,
    /// Smallest cluster HDBSCAN may report.
    pub min_cluster_size: usize,
    pub metric: DistanceMetric,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            algorithm: DensityAlgorithm::default(),
            eps: defaults::DEFAULT_EPS,
            min_samples: defaults::DEFAULT_MIN_SAMPLES,
            min_cluster_size: defaults::DEFAULT_MIN_CLUSTER_SIZE,
            metric: DistanceMetric::default(),
        }
    }
}
