use serde::{Deserialize, Serialize};

use super::defaults;
use super::DistanceMetric;

/// Weights combining normalised quality metrics into one composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    /// Silhouette cohesion (higher is better).
    pub cohesion: f64,
    /// Davies-Bouldin dispersion, inverted.
    pub dispersion: f64,
    /// Cluster count, inverted.
    pub cluster_count: f64,
    /// Outlier fraction, inverted.
    pub outliers: f64,
}

impl CompositeWeights {
    pub fn total(&self) -> f64 {
        self.cohesion + self.dispersion + self.cluster_count + self.outliers
    }
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            cohesion: defaults::DEFAULT_WEIGHT_COHESION,
            dispersion: defaults::DEFAULT_WEIGHT_DISPERSION,
            cluster_count: defaults::DEFAULT_WEIGHT_CLUSTER_COUNT,
            outliers: defaults::DEFAULT_WEIGHT_OUTLIERS,
        }
    }
}

/// Quality evaluator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub metric: DistanceMetric,
    pub weights: CompositeWeights,
}
