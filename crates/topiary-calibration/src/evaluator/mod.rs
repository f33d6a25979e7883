//! Quality evaluator: unsupervised metrics for one labelling.

pub mod composite;
pub mod metrics;

use topiary_clustering::algorithms::similarity;
use topiary_core::config::{DistanceMetric, EvaluationConfig};
use topiary_core::errors::InputShapeError;
use topiary_core::models::{labels, QualityReport};
use topiary_core::{ClusterLabel, TopiaryResult};
use tracing::debug;

pub use composite::composite_scores;

/// Computes [`QualityReport`]s and composite scores.
///
/// Calinski-Harabasz and Davies-Bouldin are Euclidean indices; under the
/// cosine metric they are computed on L2-normalised vectors.
#[derive(Debug, Clone, Default)]
pub struct QualityEvaluator {
    config: EvaluationConfig,
}

impl QualityEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Score `labels` against `embeddings`. Fewer than two clusters yields
    /// `None` metrics rather than an error.
    pub fn evaluate(
        &self,
        embeddings: &[Vec<f32>],
        labels: &[ClusterLabel],
    ) -> TopiaryResult<QualityReport> {
        if labels.len() != embeddings.len() {
            return Err(InputShapeError::LabelCountMismatch {
                expected: embeddings.len(),
                actual: labels.len(),
            }
            .into());
        }
        similarity::validate_matrix(embeddings)?;

        let n_points = labels.len();
        let n_outliers = labels::noise_count(labels);
        let groups: Vec<Vec<usize>> = labels::group_indices(labels).into_values().collect();
        let n_clusters = groups.len();
        let outlier_fraction = if n_points == 0 {
            0.0
        } else {
            n_outliers as f64 / n_points as f64
        };

        let mut report = QualityReport {
            n_points,
            n_clusters,
            n_outliers,
            outlier_fraction,
            cohesion: None,
            separation: None,
            dispersion: None,
        };
        if report.is_degenerate() {
            debug!(n_points, n_clusters, "fewer than two clusters; metrics left null");
            return Ok(report);
        }

        let normalized;
        let points: &[Vec<f32>] = match self.config.metric {
            DistanceMetric::Cosine => {
                normalized = embeddings
                    .iter()
                    .map(|e| similarity::l2_normalize(e))
                    .collect::<Vec<_>>();
                &normalized
            }
            DistanceMetric::Euclidean => embeddings,
        };
        report.cohesion = Some(metrics::silhouette(points, &groups, self.config.metric));
        report.separation = Some(metrics::calinski_harabasz(points, &groups));
        report.dispersion = Some(metrics::davies_bouldin(points, &groups));
        debug!(
            n_clusters,
            n_outliers,
            cohesion = report.cohesion,
            dispersion = report.dispersion,
            "labelling evaluated"
        );
        Ok(report)
    }

    /// Composite scores for a batch under the configured weights.
    pub fn composite(&self, reports: &[QualityReport]) -> Vec<f64> {
        composite_scores(reports, &self.config.weights)
    }
}
