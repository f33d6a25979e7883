use serde::{Deserialize, Serialize};

use super::defaults;

/// Agglomerative linkage criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// UPGMA.
    #[default]
    Average,
    Complete,
    Single,
    Ward,
}

/// Tree builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    pub linkage: Linkage,
    /// Number of evenly spaced cut heights when `thresholds` is empty.
    pub levels: usize,
    /// Explicit cut heights, ascending.
    pub thresholds: Vec<f64>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            linkage: Linkage::default(),
            levels: defaults::DEFAULT_HIERARCHY_LEVELS,
            thresholds: Vec::new(),
        }
    }
}
