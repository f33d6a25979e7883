//! Grid search over merge parameters.
//!
//! Every trial starts from the same density labels and a shared, read-only
//! term index; trials never observe one another. The stop flag is checked
//! before each trial, so cancellation never interrupts a merge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use topiary_clustering::algorithms::similarity;
use topiary_clustering::{KeywordExtractor, MergeEngine, Stopwords, TermIndex};
use topiary_core::config::{self, CalibrationConfig, KeywordConfig, MergeConfig};
use topiary_core::errors::InputShapeError;
use topiary_core::models::{EvaluationRecord, MergeParams, QualityReport};
use topiary_core::{ClusterLabel, TopiaryConfig, TopiaryResult};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::evaluator::QualityEvaluator;
use crate::grid::ParameterGrid;

/// All records of one calibration run, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Sorted by composite score descending, then trial index.
    pub records: Vec<EvaluationRecord>,
    pub top_k: Vec<EvaluationRecord>,
    /// Set when the stop flag ended the run before every trial ran.
    pub cancelled: bool,
}

impl CalibrationReport {
    pub fn best(&self) -> Option<&EvaluationRecord> {
        self.records.first()
    }

    pub fn record_for(&self, params: &MergeParams) -> Option<&EvaluationRecord> {
        self.records.iter().find(|r| r.config.same_as(params))
    }

    pub fn to_json(&self) -> TopiaryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

struct Trial {
    index: usize,
    params: MergeParams,
    report: QualityReport,
    merges: usize,
}

/// Runs the merge engine once per grid point and ranks the results.
pub struct CalibrationHarness {
    calibration: CalibrationConfig,
    merge: MergeConfig,
    keywords: KeywordConfig,
    evaluator: QualityEvaluator,
    stop: Arc<AtomicBool>,
}

impl CalibrationHarness {
    pub fn new(config: &TopiaryConfig) -> Self {
        Self {
            calibration: config.calibration.clone(),
            merge: config.merge.clone(),
            keywords: config.keywords.clone(),
            evaluator: QualityEvaluator::new(config.evaluation.clone()),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the grid and run options.
    pub fn with_calibration(mut self, calibration: CalibrationConfig) -> Self {
        self.calibration = calibration;
        self
    }

    /// Share an external stop flag.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Flag that, once set, skips every trial not yet started.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn grid(&self) -> ParameterGrid {
        ParameterGrid::from_config(&self.calibration)
    }

    pub fn run(
        &self,
        embeddings: &[Vec<f32>],
        texts: &[String],
        labels: &[ClusterLabel],
        stopwords: &Stopwords,
    ) -> TopiaryResult<CalibrationReport> {
        self.run_resuming(embeddings, texts, labels, stopwords, &[])
    }

    /// As [`run`](Self::run), reusing `previous` records for grid points
    /// they already cover. Previous records outside the grid are dropped.
    pub fn run_resuming(
        &self,
        embeddings: &[Vec<f32>],
        texts: &[String],
        labels: &[ClusterLabel],
        stopwords: &Stopwords,
        previous: &[EvaluationRecord],
    ) -> TopiaryResult<CalibrationReport> {
        config::validate_grid(&self.calibration)?;
        config::validate_weights(&self.evaluator.config().weights)?;
        if texts.len() != embeddings.len() {
            return Err(InputShapeError::CountMismatch {
                texts: texts.len(),
                embeddings: embeddings.len(),
            }
            .into());
        }
        if labels.len() != embeddings.len() {
            return Err(InputShapeError::LabelCountMismatch {
                expected: embeddings.len(),
                actual: labels.len(),
            }
            .into());
        }
        similarity::validate_matrix(embeddings)?;

        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        let grid = self.grid();
        let span = topiary_observability::calibration_span!(grid.len());
        let _guard = span.enter();

        let mut carried: Vec<EvaluationRecord> = Vec::new();
        let mut pending: Vec<(usize, MergeParams)> = Vec::new();
        for (index, params) in grid.combinations().into_iter().enumerate() {
            match previous.iter().find(|r| r.config.same_as(&params)) {
                Some(record) => carried.push(EvaluationRecord {
                    trial: index,
                    ..record.clone()
                }),
                None => pending.push((index, params)),
            }
        }
        if carried.len() < previous.len() {
            debug!(
                dropped = previous.len() - carried.len(),
                "previous records outside the grid dropped"
            );
        }

        let extractor = KeywordExtractor::new(&self.keywords).with_stopwords(stopwords.clone());
        let index = extractor.index(texts);
        let engine = MergeEngine::new(self.merge.clone(), extractor);
        let run_trial =
            |&(trial, params): &(usize, MergeParams)| -> Option<TopiaryResult<Trial>> {
                if self.stop.load(Ordering::SeqCst) {
                    return None;
                }
                Some(self.trial(&engine, &index, embeddings, labels, trial, params))
            };
        let outcomes: Vec<Option<TopiaryResult<Trial>>> = if self.calibration.parallel {
            pending.par_iter().map(run_trial).collect()
        } else {
            pending.iter().map(run_trial).collect()
        };

        let mut cancelled = false;
        let mut trials: Vec<Trial> = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                None => cancelled = true,
                Some(Ok(trial)) => trials.push(trial),
                Some(Err(e)) if e.is_recoverable() => {
                    warn!(error = %e, "calibration trial degraded; skipped");
                }
                Some(Err(e)) => return Err(e.in_stage("calibration")),
            }
        }

        let n_points = embeddings.len();
        let mut records: Vec<EvaluationRecord> = Vec::with_capacity(carried.len() + trials.len());
        let mut reports: Vec<QualityReport> = Vec::with_capacity(records.capacity());
        for record in carried {
            reports.push(report_from_record(&record, n_points));
            records.push(record);
        }
        for trial in trials {
            let mut record = EvaluationRecord::from_report(trial.index, trial.params, &trial.report);
            record.merges = trial.merges;
            records.push(record);
            reports.push(trial.report);
        }

        let scores = self.evaluator.composite(&reports);
        for (record, score) in records.iter_mut().zip(scores) {
            record.composite_score = score;
        }
        records.sort_by(|a, b| {
            b.composite_score
                .total_cmp(&a.composite_score)
                .then(a.trial.cmp(&b.trial))
        });
        let top_k: Vec<EvaluationRecord> = records
            .iter()
            .take(self.calibration.top_k)
            .cloned()
            .collect();

        let report = CalibrationReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            records,
            top_k,
            cancelled,
        };
        info!(
            run_id = %report.run_id,
            trials = grid.len(),
            evaluated = report.records.len(),
            cancelled,
            best = report.best().map(|r| r.composite_score),
            "calibration finished"
        );
        Ok(report)
    }

    fn trial(
        &self,
        engine: &MergeEngine,
        index: &TermIndex,
        embeddings: &[Vec<f32>],
        labels: &[ClusterLabel],
        trial: usize,
        params: MergeParams,
    ) -> TopiaryResult<Trial> {
        let outcome = engine.with_params(params).run_with_index(embeddings, index, labels)?;
        let report = self.evaluator.evaluate(embeddings, &outcome.labels)?;
        debug!(
            trial,
            alpha = params.alpha,
            beta = params.beta,
            gamma = params.gamma,
            min_score = params.min_score,
            clusters = report.n_clusters,
            merges = outcome.merge_count(),
            "calibration trial finished"
        );
        Ok(Trial {
            index: trial,
            params,
            report,
            merges: outcome.merge_count(),
        })
    }
}

fn report_from_record(record: &EvaluationRecord, n_points: usize) -> QualityReport {
    QualityReport {
        n_points,
        n_clusters: record.n_clusters,
        n_outliers: record.n_outliers,
        outlier_fraction: if n_points == 0 {
            0.0
        } else {
            record.n_outliers as f64 / n_points as f64
        },
        cohesion: record.cohesion_metric,
        separation: record.separation_metric,
        dispersion: record.dispersion_metric,
    }
}
