use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::MergeParams;

/// How the three merge-score components are brought onto a common scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoreNormalization {
    /// Components are used as computed; each already lies in [0, 1].
    #[default]
    Bounded,
    /// Min-max over the initial pair set, frozen for the run.
    MinMax,
    /// Z-score over the initial pair set, frozen for the run, squashed
    /// through the logistic function.
    ZScore,
}

/// Cluster merge engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Stop once this many clusters remain.
    pub target_clusters: usize,
    /// Weight of centroid cohesion.
    pub alpha: f64,
    /// Weight of keyword overlap.
    pub beta: f64,
    /// Weight of the size-imbalance penalty.
    pub gamma: f64,
    /// Best pair must score at least this to be merged.
    pub min_score: f64,
    pub normalization: ScoreNormalization,
    /// Veto merges that drag internal cohesion below this floor.
    pub cohesion_floor: Option<f64>,
}

impl MergeConfig {
    /// The four tunable scoring parameters.
    pub fn params(&self) -> MergeParams {
        MergeParams {
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            min_score: self.min_score,
        }
    }

    /// Copy of this config with the scoring parameters replaced.
    pub fn with_params(&self, params: MergeParams) -> Self {
        Self {
            alpha: params.alpha,
            beta: params.beta,
            gamma: params.gamma,
            min_score: params.min_score,
            ..self.clone()
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            target_clusters: defaults::DEFAULT_TARGET_CLUSTERS,
            alpha: defaults::DEFAULT_ALPHA,
            beta: defaults::DEFAULT_BETA,
            gamma: defaults::DEFAULT_GAMMA,
            min_score: defaults::DEFAULT_MIN_SCORE,
            normalization: ScoreNormalization::default(),
            cohesion_floor: None,
        }
    }
}
