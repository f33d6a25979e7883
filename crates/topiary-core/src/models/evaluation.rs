use serde::{Deserialize, Serialize};

/// The four merge-engine parameters swept by calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergeParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// May be `+inf` to forbid every merge.
    #[serde(with = "super::float_serde")]
    pub min_score: f64,
}

impl MergeParams {
    /// Bitwise identity, so `inf` and `nan` grid points compare sanely.
    pub fn same_as(&self, other: &MergeParams) -> bool {
        self.alpha.to_bits() == other.alpha.to_bits()
            && self.beta.to_bits() == other.beta.to_bits()
            && self.gamma.to_bits() == other.gamma.to_bits()
            && self.min_score.to_bits() == other.min_score.to_bits()
    }
}

/// Unsupervised quality metrics for one labelling.
///
/// Metric fields are `None` when fewer than two clusters exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub n_points: usize,
    pub n_clusters: usize,
    pub n_outliers: usize,
    pub outlier_fraction: f64,
    /// Mean silhouette, -1..1, higher is tighter.
    pub cohesion: Option<f64>,
    /// Calinski-Harabasz index, higher is better.
    pub separation: Option<f64>,
    /// Davies-Bouldin index, lower is better.
    pub dispersion: Option<f64>,
}

impl QualityReport {
    pub fn is_degenerate(&self) -> bool {
        self.n_clusters < 2
    }
}

/// Outcome of one calibration trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Position of the configuration in the grid.
    pub trial: usize,
    pub config: MergeParams,
    pub n_clusters: usize,
    pub n_outliers: usize,
    pub cohesion_metric: Option<f64>,
    pub separation_metric: Option<f64>,
    pub dispersion_metric: Option<f64>,
    pub composite_score: f64,
    /// Merges the engine performed in this trial.
    #[serde(default)]
    pub merges: usize,
}

impl EvaluationRecord {
    pub fn from_report(trial: usize, config: MergeParams, report: &QualityReport) -> Self {
        Self {
            trial,
            config,
            n_clusters: report.n_clusters,
            n_outliers: report.n_outliers,
            cohesion_metric: report.cohesion,
            separation_metric: report.separation,
            dispersion_metric: report.dispersion,
            composite_score: 0.0,
            merges: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_min_score_round_trips_through_json() {
        let params = MergeParams {
            alpha: 0.5,
            beta: 0.3,
            gamma: 0.2,
            min_score: f64::INFINITY,
        };
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"inf\""));
        let back: MergeParams = serde_json::from_str(&json).unwrap();
        assert!(back.same_as(&params));
    }

    #[test]
    fn null_metrics_serialize_as_null() {
        let record = EvaluationRecord::from_report(
            0,
            MergeParams {
                alpha: 1.0,
                beta: 0.0,
                gamma: 0.0,
                min_score: 0.5,
            },
            &QualityReport {
                n_points: 4,
                n_clusters: 1,
                n_outliers: 0,
                outlier_fraction: 0.0,
                cohesion: None,
                separation: None,
                dispersion: None,
            },
        );
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["cohesion_metric"].is_null());
    }
}
