//! Multi-resolution cut table: `height -> leaf labels`, one row per
//! distinct partition.

use serde::{Deserialize, Serialize};
use topiary_core::models::labels;
use topiary_core::ClusterLabel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRow {
    #[serde(with = "topiary_core::models::float_serde")]
    pub height: f64,
    /// Group per dendrogram leaf, dense `0..n_groups-1`.
    pub labels: Vec<ClusterLabel>,
    pub n_groups: usize,
}

impl CutRow {
    pub fn new(height: f64, labels: Vec<ClusterLabel>) -> Self {
        let n_groups = labels::cluster_count(&labels);
        Self {
            height,
            labels,
            n_groups,
        }
    }

    /// Leaves per group, in group order.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        labels::group_indices(&self.labels).into_values().collect()
    }
}

/// Rows ordered by ascending height; consecutive rows always differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutTable {
    n_leaves: usize,
    rows: Vec<CutRow>,
}

impl CutTable {
    pub fn new(n_leaves: usize, rows: Vec<CutRow>) -> Self {
        Self { n_leaves, rows }
    }

    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    pub fn rows(&self) -> &[CutRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row in force at `height`: the last row at or below it.
    pub fn at(&self, height: f64) -> Option<&CutRow> {
        self.rows.iter().take_while(|r| r.height <= height).last()
    }

    pub fn coarsest(&self) -> Option<&CutRow> {
        self.rows.last()
    }
}
