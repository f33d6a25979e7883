//! TopicPipeline: the end-to-end run, guarded so only one executes at a time.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use topiary_calibration::{CalibrationHarness, CalibrationReport, QualityEvaluator};
use topiary_clustering::{apply_grouping, DensityClusterer, KeywordExtractor, MergeEngine, VectorStore};
use topiary_core::errors::ClusteringError;
use topiary_core::models::{labels, SummaryReport};
use topiary_core::traits::ISummarizer;
use topiary_core::{ClusterLabel, TopiaryConfig, TopiaryError, TopiaryResult};
use topiary_hierarchy::{medoid_vectors, CutTable, Dendrogram, TopicSummarizer, TopicTree};
use topiary_observability::{
    density_span, merge_span, pipeline_span, store_span, summarize_span, tree_span, StageTimer,
};
use tracing::{info, warn};

use crate::artifacts::PipelineArtifacts;

/// Runs density clustering, merging, tree building, summarisation and
/// evaluation over a vector store.
pub struct TopicPipeline {
    config: TopiaryConfig,
    summarizer: Option<Arc<dyn ISummarizer>>,
    /// Guard: only one run at a time.
    is_running: Arc<AtomicBool>,
}

impl TopicPipeline {
    /// Validates `config` up front.
    pub fn new(config: TopiaryConfig) -> TopiaryResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            summarizer: None,
            is_running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Load, override from the environment, and validate a TOML config.
    pub fn from_config_file(path: &Path) -> TopiaryResult<Self> {
        Self::new(TopiaryConfig::load(path)?)
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn ISummarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn config(&self) -> &TopiaryConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Full run. Fatal errors are tagged with the stage that raised them.
    pub fn run(&self, store: &VectorStore) -> TopiaryResult<PipelineArtifacts> {
        let _guard = self.acquire()?;
        self.run_stages(store)
    }

    /// Grid-search the merge parameters from this pipeline's density labels.
    pub fn calibrate(&self, store: &VectorStore) -> TopiaryResult<CalibrationReport> {
        let _guard = self.acquire()?;
        let labels = self.density_labels(store, &mut StageTimer::new())?;
        let extractor = KeywordExtractor::new(&self.config.keywords);
        CalibrationHarness::new(&self.config)
            .run(store.embeddings(), store.texts(), &labels, extractor.stopwords())
            .map_err(|e| e.in_stage("calibration"))
    }

    fn acquire(&self) -> TopiaryResult<RunGuard<'_>> {
        self.is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| RunGuard(&self.is_running))
            .map_err(|_| TopiaryError::AlreadyRunning)
    }

    /// Projection, density clustering and manual grouping.
    fn density_labels(
        &self,
        store: &VectorStore,
        timer: &mut StageTimer,
    ) -> TopiaryResult<Vec<ClusterLabel>> {
        let points: Cow<'_, [Vec<f32>]> = {
            let _span = store_span!(store.len(), store.dimension()).entered();
            match self.config.store.projection_components {
                Some(n) => Cow::Owned(
                    timer
                        .time("projection", || store.project(n))
                        .map_err(|e| e.in_stage("projection"))?,
                ),
                None => Cow::Borrowed(store.embeddings()),
            }
        };

        let density = {
            let _span = density_span!(points.len(), self.config.density.algorithm).entered();
            let clusterer = DensityClusterer::new(self.config.density.clone());
            timer
                .time("density", || clusterer.cluster(&points))
                .map_err(|e| e.in_stage("density"))?
        };
        Ok(apply_grouping(&density, &self.config.grouping))
    }

    fn run_stages(&self, store: &VectorStore) -> TopiaryResult<PipelineArtifacts> {
        let _span = pipeline_span!(store.len()).entered();
        let mut timer = StageTimer::new();

        let initial = self.density_labels(store, &mut timer)?;
        let initial_clusters = labels::cluster_count(&initial);
        if initial_clusters < 2 {
            warn!(
                clusters = initial_clusters,
                "density clustering left fewer than two clusters"
            );
        }

        let outcome = {
            let _span = merge_span!(initial_clusters, self.config.merge.target_clusters).entered();
            let engine = MergeEngine::new(
                self.config.merge.clone(),
                KeywordExtractor::new(&self.config.keywords),
            );
            timer
                .time("merge", || engine.run(store.embeddings(), store.texts(), &initial))
                .map_err(|e| e.in_stage("merge"))?
        };

        let (tree, cut_table) = {
            let _span = tree_span!(outcome.cluster_count()).entered();
            timer.time("tree", || self.build_tree(store, &outcome.labels, &outcome.keywords))?
        };

        let (tree, summary_report) = match (tree, &self.summarizer) {
            (Some(tree), Some(summarizer)) if self.config.summarizer.enabled => {
                let _span = summarize_span!(summarizer.name(), tree.node_count()).entered();
                let report = timer.time("summarize", || {
                    let samples = topic_samples(&tree, store.texts(), &outcome.labels);
                    let summarizer =
                        TopicSummarizer::new(&**summarizer, self.config.summarizer.clone());
                    summarizer.summarize(&summarizer.build_request(&samples))
                });
                (Some(tree.with_summaries(&report.summaries)), report)
            }
            (tree, _) => (tree, SummaryReport::default()),
        };

        let evaluation = timer
            .time("evaluation", || {
                QualityEvaluator::new(self.config.evaluation.clone())
                    .evaluate(store.embeddings(), &outcome.labels)
            })
            .map_err(|e| e.in_stage("evaluation"))?;

        info!(
            chunks = store.len(),
            clusters = outcome.cluster_count(),
            noise = labels::noise_count(&outcome.labels),
            merges = outcome.merge_count(),
            tree_nodes = tree.as_ref().map(TopicTree::node_count),
            summary_failures = summary_report.failures.len(),
            cohesion = evaluation.cohesion,
            "pipeline finished"
        );

        Ok(PipelineArtifacts {
            labels: outcome.labels,
            keywords: outcome.keywords,
            tree,
            cut_table,
            merge_steps: outcome.steps,
            summary_report,
            evaluation,
            stage_timings: timer.into_timings(),
        })
    }

    /// Dendrogram over final-cluster medoids, its cut table, and the tree.
    /// No clusters is a degradation, not a failure.
    fn build_tree(
        &self,
        store: &VectorStore,
        final_labels: &[ClusterLabel],
        keywords: &BTreeMap<ClusterLabel, Vec<String>>,
    ) -> TopiaryResult<(Option<TopicTree>, Option<CutTable>)> {
        let clusters = labels::cluster_count(final_labels);
        if clusters == 0 {
            let degenerate = TopiaryError::from(ClusteringError::Degenerate {
                stage: "tree".to_string(),
                clusters,
            });
            warn!(error = %degenerate, "no clusters to build a tree from");
            return Ok((None, None));
        }

        let hierarchy = &self.config.hierarchy;
        let medoids = medoid_vectors(store.embeddings(), final_labels);
        let dendrogram = Dendrogram::from_medoids(&medoids, hierarchy.linkage)
            .map_err(|e| e.in_stage("tree"))?;
        let thresholds = if hierarchy.thresholds.is_empty() {
            dendrogram.auto_thresholds(hierarchy.levels)
        } else {
            hierarchy.thresholds.clone()
        };
        let table = dendrogram.cut_table(&thresholds);
        let tree = TopicTree::from_cut_table(&table, keywords).map_err(|e| e.in_stage("tree"))?;
        Ok((Some(tree), Some(table)))
    }
}

/// Clears the running flag when dropped, including during a panic unwind.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Member texts for every tree node, in chunk order.
fn topic_samples(
    tree: &TopicTree,
    texts: &[String],
    final_labels: &[ClusterLabel],
) -> BTreeMap<String, Vec<String>> {
    let members = labels::group_indices(final_labels);
    tree.node_ids()
        .into_iter()
        .map(|id| {
            let mut indices: Vec<usize> = tree
                .leaves_under(id)
                .into_iter()
                .filter_map(TopicTree::parse_leaf_id)
                .filter_map(|label| members.get(&label))
                .flatten()
                .copied()
                .collect();
            indices.sort_unstable();
            let samples = indices.into_iter().filter_map(|i| texts.get(i).cloned()).collect();
            (id.to_string(), samples)
        })
        .collect()
}
