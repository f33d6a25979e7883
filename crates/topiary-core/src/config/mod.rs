//! Configuration with layered resolution.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`TOPIARY_*`)
//! 2. Config file (`topiary.toml`)
//! 3. Compiled defaults

pub mod calibration_config;
pub mod defaults;
pub mod density_config;
pub mod evaluation_config;
pub mod grouping_config;
pub mod hierarchy_config;
pub mod keyword_config;
pub mod merge_config;
pub mod observability_config;
pub mod store_config;
pub mod summarizer_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use calibration_config::CalibrationConfig;
pub use density_config::{DensityAlgorithm, DensityConfig, DistanceMetric};
pub use evaluation_config::{CompositeWeights, EvaluationConfig};
pub use grouping_config::{GroupAssignment, GroupingConfig};
pub use hierarchy_config::{HierarchyConfig, Linkage};
pub use keyword_config::KeywordConfig;
pub use merge_config::{MergeConfig, ScoreNormalization};
pub use observability_config::ObservabilityConfig;
pub use store_config::StoreConfig;
pub use summarizer_config::SummarizerConfig;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopiaryConfig {
    pub store: StoreConfig,
    pub density: DensityConfig,
    pub keywords: KeywordConfig,
    pub merge: MergeConfig,
    pub hierarchy: HierarchyConfig,
    pub evaluation: EvaluationConfig,
    pub calibration: CalibrationConfig,
    pub summarizer: SummarizerConfig,
    pub grouping: GroupingConfig,
    pub observability: ObservabilityConfig,
}

impl TopiaryConfig {
    /// Load a config file, apply environment overrides, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string. Unknown keys are ignored.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `TOPIARY_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TOPIARY_EPS") {
            self.density.eps = parse_env("TOPIARY_EPS", &v)?;
        }
        if let Some(v) = lookup("TOPIARY_MIN_SAMPLES") {
            self.density.min_samples = parse_env("TOPIARY_MIN_SAMPLES", &v)?;
        }
        if let Some(v) = lookup("TOPIARY_TARGET_CLUSTERS") {
            self.merge.target_clusters = parse_env("TOPIARY_TARGET_CLUSTERS", &v)?;
        }
        if let Some(v) = lookup("TOPIARY_MIN_SCORE") {
            self.merge.min_score = parse_env("TOPIARY_MIN_SCORE", &v)?;
        }
        if let Some(v) = lookup("TOPIARY_LOG") {
            self.observability.log_level = v;
        }
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.density.eps > 0.0) {
            return Err(invalid("density.eps", "must be greater than 0"));
        }
        if self.density.min_samples == 0 {
            return Err(invalid("density.min_samples", "must be at least 1"));
        }
        if self.density.algorithm == DensityAlgorithm::Dbscan && self.density.min_samples < 2 {
            return Err(invalid("density.min_samples", "dbscan needs at least 2"));
        }
        if self.density.min_cluster_size < 2 {
            return Err(invalid("density.min_cluster_size", "must be at least 2"));
        }
        if let Some(0) = self.store.projection_components {
            return Err(invalid("store.projection_components", "must be at least 1"));
        }
        if self.keywords.top_n == 0 {
            return Err(invalid("keywords.top_n", "must be at least 1"));
        }
        check_weight("merge.alpha", self.merge.alpha)?;
        check_weight("merge.beta", self.merge.beta)?;
        check_weight("merge.gamma", self.merge.gamma)?;
        if self.merge.min_score.is_nan() {
            return Err(invalid("merge.min_score", "must be a number"));
        }
        if let Some(floor) = self.merge.cohesion_floor {
            if !(-1.0..=1.0).contains(&floor) {
                return Err(invalid("merge.cohesion_floor", "must be between -1.0 and 1.0"));
            }
        }
        if self.hierarchy.thresholds.is_empty() && self.hierarchy.levels == 0 {
            return Err(invalid("hierarchy.levels", "must be at least 1"));
        }
        if self.hierarchy.thresholds.windows(2).any(|w| w[1] < w[0]) {
            return Err(invalid("hierarchy.thresholds", "must be ascending"));
        }
        validate_weights(&self.evaluation.weights)?;
        validate_grid(&self.calibration)?;
        if self.summarizer.max_samples_per_topic == 0 {
            return Err(invalid("summarizer.max_samples_per_topic", "must be at least 1"));
        }
        Ok(())
    }
}

/// Composite weights must be finite, non-negative and not all zero.
pub fn validate_weights(weights: &CompositeWeights) -> Result<(), ConfigError> {
    check_weight("evaluation.weights.cohesion", weights.cohesion)?;
    check_weight("evaluation.weights.dispersion", weights.dispersion)?;
    check_weight("evaluation.weights.cluster_count", weights.cluster_count)?;
    check_weight("evaluation.weights.outliers", weights.outliers)?;
    if weights.total() <= 0.0 {
        return Err(invalid("evaluation.weights", "at least one weight must be positive"));
    }
    Ok(())
}

/// Every grid axis must be non-empty; weight axes must be finite and non-negative.
pub fn validate_grid(grid: &CalibrationConfig) -> Result<(), ConfigError> {
    let axes: [(&str, &[f64], bool); 4] = [
        ("alpha", &grid.alpha, true),
        ("beta", &grid.beta, true),
        ("gamma", &grid.gamma, true),
        ("min_score", &grid.min_score, false),
    ];
    for (axis, values, is_weight) in axes {
        if values.is_empty() {
            return Err(ConfigError::EmptyGrid {
                axis: axis.to_string(),
            });
        }
        for &value in values {
            if value.is_nan() {
                return Err(invalid(&format!("calibration.{axis}"), "must be a number"));
            }
            if is_weight {
                check_weight(&format!("calibration.{axis}"), value)?;
            }
        }
    }
    if grid.top_k == 0 {
        return Err(invalid("calibration.top_k", "must be at least 1"));
    }
    Ok(())
}

fn check_weight(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::NegativeWeight {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
        path: format!("env:{key}"),
        message: e.to_string(),
    })
}
