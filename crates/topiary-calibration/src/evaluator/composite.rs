//! Batch composite scoring.
//!
//! Each metric is min-max normalised across the batch, so scores are only
//! comparable within one call.

use topiary_core::config::CompositeWeights;
use topiary_core::models::QualityReport;

const MIN_RANGE: f64 = 1e-12;

/// Weighted sum of normalised cohesion, inverted dispersion, inverted
/// cluster count and inverted outlier fraction, one score per report.
///
/// A metric that is identical across the batch normalises to 1.0; a
/// missing metric contributes 0.0.
pub fn composite_scores(reports: &[QualityReport], weights: &CompositeWeights) -> Vec<f64> {
    let cohesion = normalize(reports.iter().map(|r| r.cohesion).collect(), false);
    let dispersion = normalize(reports.iter().map(|r| r.dispersion).collect(), true);
    let clusters = normalize(
        reports.iter().map(|r| Some(r.n_clusters as f64)).collect(),
        true,
    );
    let outliers = normalize(
        reports.iter().map(|r| Some(r.outlier_fraction)).collect(),
        true,
    );

    (0..reports.len())
        .map(|i| {
            weights.cohesion * cohesion[i]
                + weights.dispersion * dispersion[i]
                + weights.cluster_count * clusters[i]
                + weights.outliers * outliers[i]
        })
        .collect()
}

fn normalize(values: Vec<Option<f64>>, invert: bool) -> Vec<f64> {
    let present = values.iter().flatten().copied().filter(|v| v.is_finite());
    let (lo, hi) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    values
        .into_iter()
        .map(|v| match v {
            Some(v) if v.is_finite() => {
                if hi - lo < MIN_RANGE {
                    1.0
                } else {
                    let scaled = (v - lo) / (hi - lo);
                    if invert {
                        1.0 - scaled
                    } else {
                        scaled
                    }
                }
            }
            _ => 0.0,
        })
        .collect()
}
