//! Declarative manual regrouping, applied through the same dense remap the
//! merge engine uses.

use topiary_core::config::GroupingConfig;
use topiary_core::models::labels;
use topiary_core::ClusterLabel;
use tracing::info;

/// Fold clusters according to `grouping`. Unmapped clusters keep their own
/// group; the result is dense `0..k-1` with noise untouched.
pub fn apply_grouping(labels: &[ClusterLabel], grouping: &GroupingConfig) -> Vec<ClusterLabel> {
    if grouping.is_empty() {
        return labels::remap_dense(labels);
    }
    let before = labels::cluster_count(labels);
    let out = labels::apply_mapping(labels, &grouping.as_map());
    info!(
        rules = grouping.assignments.len(),
        before,
        after = labels::cluster_count(&out),
        "manual grouping applied"
    );
    out
}
