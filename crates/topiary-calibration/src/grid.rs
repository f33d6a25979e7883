//! Cartesian grid over the merge engine's tunable parameters.

use serde::{Deserialize, Serialize};
use topiary_core::config::CalibrationConfig;
use topiary_core::models::MergeParams;

/// Candidate values per axis. Trial `i` is the `i`-th combination with
/// `alpha` varying slowest and `min_score` fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
    pub gamma: Vec<f64>,
    pub min_score: Vec<f64>,
}

impl ParameterGrid {
    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self {
            alpha: config.alpha.clone(),
            beta: config.beta.clone(),
            gamma: config.gamma.clone(),
            min_score: config.min_score.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.alpha.len() * self.beta.len() * self.gamma.len() * self.min_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parameters of trial `index`, if it lies inside the grid.
    pub fn get(&self, index: usize) -> Option<MergeParams> {
        if index >= self.len() {
            return None;
        }
        let m = index % self.min_score.len();
        let rest = index / self.min_score.len();
        let g = rest % self.gamma.len();
        let rest = rest / self.gamma.len();
        let b = rest % self.beta.len();
        let a = rest / self.beta.len();
        Some(MergeParams {
            alpha: self.alpha[a],
            beta: self.beta[b],
            gamma: self.gamma[g],
            min_score: self.min_score[m],
        })
    }

    /// Every combination in trial order.
    pub fn combinations(&self) -> Vec<MergeParams> {
        let mut out = Vec::with_capacity(self.len());
        for &alpha in &self.alpha {
            for &beta in &self.beta {
                for &gamma in &self.gamma {
                    for &min_score in &self.min_score {
                        out.push(MergeParams {
                            alpha,
                            beta,
                            gamma,
                            min_score,
                        });
                    }
                }
            }
        }
        out
    }
}
