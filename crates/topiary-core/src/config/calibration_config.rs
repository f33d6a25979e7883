use serde::{Deserialize, Serialize};

use super::defaults;

/// Calibration harness configuration: the parameter grid plus run options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
    pub gamma: Vec<f64>,
    pub min_score: Vec<f64>,
    /// Records reported as the best configurations.
    pub top_k: usize,
    /// Run trials on the rayon pool.
    pub parallel: bool,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            alpha: defaults::DEFAULT_GRID_ALPHA.to_vec(),
            beta: defaults::DEFAULT_GRID_BETA.to_vec(),
            gamma: defaults::DEFAULT_GRID_GAMMA.to_vec(),
            min_score: defaults::DEFAULT_GRID_MIN_SCORE.to_vec(),
            top_k: defaults::DEFAULT_TOP_K,
            parallel: defaults::DEFAULT_PARALLEL_TRIALS,
        }
    }
}
