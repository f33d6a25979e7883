use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ClusterLabel;

/// One manual regrouping rule: every point labelled `from` moves to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub from: ClusterLabel,
    pub to: ClusterLabel,
}

/// Declarative old-cluster -> new-cluster table applied before merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub assignments: Vec<GroupAssignment>,
}

impl GroupingConfig {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Lookup table. Later rules for the same `from` win.
    pub fn as_map(&self) -> BTreeMap<ClusterLabel, ClusterLabel> {
        self.assignments.iter().map(|a| (a.from, a.to)).collect()
    }
}
