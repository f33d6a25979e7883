use serde::{Deserialize, Serialize};

use super::labels::ClusterLabel;

/// One accepted merge, with the score components that justified it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeStep {
    pub step: usize,
    /// Surviving (lower) cluster id.
    pub kept: ClusterLabel,
    /// Cluster folded into `kept`.
    pub absorbed: ClusterLabel,
    pub score: f64,
    pub cohesion: f64,
    pub keyword_overlap: f64,
    pub size_imbalance: f64,
    pub clusters_after: usize,
}
