//! # topiary-calibration
//!
//! Scores labellings without ground truth (silhouette, Calinski-Harabasz,
//! Davies-Bouldin), folds them into a weighted composite, and sweeps the
//! merge engine's `(alpha, beta, gamma, min_score)` grid to rank
//! configurations.

pub mod evaluator;
pub mod grid;
pub mod harness;

pub use evaluator::{composite_scores, QualityEvaluator};
pub use grid::ParameterGrid;
pub use harness::{CalibrationHarness, CalibrationReport};
