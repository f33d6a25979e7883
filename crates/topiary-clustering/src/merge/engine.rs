//! Cluster merge engine.
//!
//! Repeatedly merges the best-scoring pair of clusters until either
//! `target_clusters` remain or the best pair scores below `min_score`.
//! Ties go to the lowest `(min_id, max_id)` pair. The lower id survives.
//! Noise points are never merged and keep [`NOISE`].

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use topiary_core::config::MergeConfig;
use topiary_core::errors::{InputShapeError, TopiaryResult, TreeError};
use topiary_core::models::labels;
use topiary_core::models::{MergeHistory, MergeParams, MergeStep};
use topiary_core::{ClusterLabel, NOISE};
use tracing::{debug, info, warn};

use super::score::{PairComponents, ScoreNormalizer};
use crate::algorithms::similarity;
use crate::keywords::{KeywordExtractor, TermIndex};

/// Everything one engine run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Dense labels aligned with the input rows.
    pub labels: Vec<ClusterLabel>,
    /// Top keywords per final cluster.
    pub keywords: BTreeMap<ClusterLabel, Vec<String>>,
    /// Mean member-to-centroid cosine similarity per final cluster.
    pub cluster_cohesion: BTreeMap<ClusterLabel, f64>,
    /// Size-weighted mean of `cluster_cohesion`; 0.0 without clusters.
    pub overall_cohesion: f64,
    pub history: MergeHistory,
    pub steps: Vec<MergeStep>,
    /// Pairs rejected by the cohesion floor.
    pub vetoed: usize,
}

impl MergeOutcome {
    pub fn cluster_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn merge_count(&self) -> usize {
        self.steps.len()
    }
}

#[derive(Debug, Clone)]
struct ClusterState {
    members: Vec<usize>,
    centroid: Vec<f32>,
    keywords: Vec<String>,
    cohesion: f64,
    node: usize,
}

impl ClusterState {
    fn build(
        members: Vec<usize>,
        embeddings: &[Vec<f32>],
        index: &TermIndex,
        top_n: usize,
        node: usize,
    ) -> Self {
        Self {
            centroid: similarity::centroid(embeddings, &members),
            keywords: index.top_terms(&members, top_n),
            cohesion: similarity::internal_cohesion(embeddings, &members),
            members,
            node,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PairEntry {
    raw: PairComponents,
    score: f64,
}

/// Greedy merge engine. Stateless between runs.
#[derive(Debug, Clone)]
pub struct MergeEngine {
    config: MergeConfig,
    extractor: KeywordExtractor,
}

impl MergeEngine {
    pub fn new(config: MergeConfig, extractor: KeywordExtractor) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn params(&self) -> MergeParams {
        self.config.params()
    }

    /// Same engine with the four tunable parameters replaced.
    pub fn with_params(&self, params: MergeParams) -> Self {
        Self {
            config: self.config.with_params(params),
            extractor: self.extractor.clone(),
        }
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Validate shapes, index the corpus, and merge.
    pub fn run(
        &self,
        embeddings: &[Vec<f32>],
        texts: &[String],
        labels: &[ClusterLabel],
    ) -> TopiaryResult<MergeOutcome> {
        if texts.len() != embeddings.len() {
            return Err(InputShapeError::CountMismatch {
                texts: texts.len(),
                embeddings: embeddings.len(),
            }
            .into());
        }
        let index = self.extractor.index(texts);
        self.run_with_index(embeddings, &index, labels)
    }

    /// Merge against a prebuilt corpus index. Calibration trials share one.
    pub fn run_with_index(
        &self,
        embeddings: &[Vec<f32>],
        index: &TermIndex,
        labels: &[ClusterLabel],
    ) -> TopiaryResult<MergeOutcome> {
        if labels.len() != embeddings.len() {
            return Err(InputShapeError::LabelCountMismatch {
                expected: embeddings.len(),
                actual: labels.len(),
            }
            .into());
        }
        if index.len() != embeddings.len() {
            return Err(InputShapeError::CountMismatch {
                texts: index.len(),
                embeddings: embeddings.len(),
            }
            .into());
        }

        let params = self.config.params();
        let top_n = self.extractor.top_n();
        let mut history = MergeHistory::new();
        let mut clusters: BTreeMap<ClusterLabel, ClusterState> = labels::group_indices(labels)
            .into_iter()
            .map(|(label, members)| {
                let node = history.add_leaf(label, members.len());
                (label, ClusterState::build(members, embeddings, index, top_n, node))
            })
            .collect();
        let initial = clusters.len();

        let ids: Vec<ClusterLabel> = clusters.keys().copied().collect();
        let pair_keys: Vec<(ClusterLabel, ClusterLabel)> = ids
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| ids[i + 1..].iter().map(move |&b| (a, b)))
            .collect();
        let raw_pairs: Vec<((ClusterLabel, ClusterLabel), PairComponents)> = pair_keys
            .par_iter()
            .map(|&(a, b)| ((a, b), components(&clusters[&a], &clusters[&b])))
            .collect();

        let initial_raw: Vec<PairComponents> = raw_pairs.iter().map(|(_, c)| *c).collect();
        let normalizer = ScoreNormalizer::fit(self.config.normalization, &initial_raw);
        let mut pairs: BTreeMap<(ClusterLabel, ClusterLabel), PairEntry> = raw_pairs
            .into_iter()
            .map(|(key, raw)| {
                let score = normalizer.score(&params, &raw);
                (key, PairEntry { raw, score })
            })
            .collect();

        let mut steps = Vec::new();
        let mut vetoed = 0usize;

        while clusters.len() > self.config.target_clusters {
            let Some((&(keep, absorb), &entry)) = best_pair(&pairs) else {
                break;
            };
            if !(entry.score >= params.min_score) {
                debug!(
                    score = entry.score,
                    min_score = params.min_score,
                    clusters = clusters.len(),
                    "best pair below min_score, stopping"
                );
                break;
            }

            let mut merged: Vec<usize> = clusters[&keep]
                .members
                .iter()
                .chain(clusters[&absorb].members.iter())
                .copied()
                .collect();
            merged.sort_unstable();

            if let Some(floor) = self.config.cohesion_floor {
                let before = clusters[&keep].cohesion.min(clusters[&absorb].cohesion);
                let after = similarity::internal_cohesion(embeddings, &merged);
                if after < floor && before >= floor {
                    debug!(keep, absorb, before, after, floor, "merge vetoed by cohesion floor");
                    pairs.remove(&(keep, absorb));
                    vetoed += 1;
                    continue;
                }
            }

            let (Some(kept_state), Some(absorbed_state)) =
                (clusters.remove(&keep), clusters.remove(&absorb))
            else {
                break;
            };
            let node = history
                .add_merge(kept_state.node, absorbed_state.node, keep, entry.score)
                .ok_or(TreeError::UnknownHistoryNode {
                    id: absorbed_state.node,
                })?;
            pairs.retain(|&(a, b), _| a != keep && b != keep && a != absorb && b != absorb);

            let state = ClusterState::build(merged, embeddings, index, top_n, node);
            for (&other, other_state) in &clusters {
                let raw = components(&state, other_state);
                let key = (keep.min(other), keep.max(other));
                pairs.insert(
                    key,
                    PairEntry {
                        raw,
                        score: normalizer.score(&params, &raw),
                    },
                );
            }
            clusters.insert(keep, state);

            let step = MergeStep {
                step: steps.len(),
                kept: keep,
                absorbed: absorb,
                score: entry.score,
                cohesion: entry.raw.cohesion,
                keyword_overlap: entry.raw.keyword_overlap,
                size_imbalance: entry.raw.size_imbalance,
                clusters_after: clusters.len(),
            };
            debug!(
                step = step.step,
                kept = keep,
                absorbed = absorb,
                score = entry.score,
                clusters = clusters.len(),
                "clusters merged"
            );
            steps.push(step);
        }

        let outcome = self.finish(labels, index, clusters, history, steps, vetoed);
        info!(
            initial,
            remaining = outcome.cluster_count(),
            merges = outcome.merge_count(),
            vetoed,
            overall_cohesion = outcome.overall_cohesion,
            "merge complete"
        );
        if outcome.cluster_count() < 2 {
            warn!(clusters = outcome.cluster_count(), "fewer than two clusters after merging");
        }
        Ok(outcome)
    }

    fn finish(
        &self,
        labels: &[ClusterLabel],
        index: &TermIndex,
        clusters: BTreeMap<ClusterLabel, ClusterState>,
        mut history: MergeHistory,
        steps: Vec<MergeStep>,
        vetoed: usize,
    ) -> MergeOutcome {
        let mut merged_labels = vec![NOISE; labels.len()];
        for (&label, state) in &clusters {
            for &m in &state.members {
                merged_labels[m] = label;
            }
        }
        let lookup = labels::dense_lookup(&merged_labels);
        let dense: Vec<ClusterLabel> = merged_labels
            .iter()
            .map(|l| lookup.get(l).copied().unwrap_or(NOISE))
            .collect();

        let mut keywords = BTreeMap::new();
        let mut cluster_cohesion = BTreeMap::new();
        let mut weighted = 0.0;
        let mut covered = 0usize;
        for (label, state) in &clusters {
            let Some(&final_label) = lookup.get(label) else {
                continue;
            };
            history.set_final_label(state.node, final_label);
            keywords.insert(
                final_label,
                self.extractor.keywords_for(index, &state.members),
            );
            cluster_cohesion.insert(final_label, state.cohesion);
            weighted += state.cohesion * state.members.len() as f64;
            covered += state.members.len();
        }
        let overall_cohesion = if covered == 0 {
            0.0
        } else {
            weighted / covered as f64
        };

        MergeOutcome {
            labels: dense,
            keywords,
            cluster_cohesion,
            overall_cohesion,
            history,
            steps,
            vetoed,
        }
    }
}

fn components(a: &ClusterState, b: &ClusterState) -> PairComponents {
    PairComponents::compute(
        &a.centroid,
        &b.centroid,
        &a.keywords,
        &b.keywords,
        a.members.len(),
        b.members.len(),
    )
}

/// Highest score; on ties the first key in ascending order.
fn best_pair(
    pairs: &BTreeMap<(ClusterLabel, ClusterLabel), PairEntry>,
) -> Option<(&(ClusterLabel, ClusterLabel), &PairEntry)> {
    let mut best: Option<(&(ClusterLabel, ClusterLabel), &PairEntry)> = None;
    for (key, entry) in pairs {
        match best {
            Some((_, current)) if !(entry.score > current.score) => {}
            _ => best = Some((key, entry)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use topiary_core::config::KeywordConfig;

    fn engine(target: usize, min_score: f64) -> MergeEngine {
        let config = MergeConfig {
            target_clusters: target,
            min_score,
            ..MergeConfig::default()
        };
        MergeEngine::new(config, KeywordExtractor::new(&KeywordConfig::default()))
    }

    /// Three tight groups: 0 and 1 point the same way, 2 is orthogonal.
    fn fixture() -> (Vec<Vec<f32>>, Vec<String>, Vec<ClusterLabel>) {
        let embeddings = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.98, 0.05, 0.0],
            vec![0.95, 0.1, 0.0],
            vec![0.97, 0.12, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.05, 0.99],
            vec![5.0, 5.0, 5.0],
        ];
        let texts = [
            "gas pipeline capacity",
            "pipeline capacity expansion",
            "pipeline capacity tariff",
            "gas pipeline tariff",
            "holiday party invitation",
            "party invitation reminder",
            "random unrelated",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let labels = vec![0, 0, 1, 1, 2, 2, NOISE];
        (embeddings, texts, labels)
    }

    #[test]
    fn merges_similar_clusters_first() {
        let (e, t, l) = fixture();
        let outcome = engine(2, 0.0).run(&e, &t, &l).unwrap();
        assert_eq!(outcome.labels, vec![0, 0, 0, 0, 1, 1, NOISE]);
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.steps[0].kept, 0);
        assert_eq!(outcome.steps[0].absorbed, 1);
        assert_eq!(outcome.history.merge_count(), 1);
    }

    #[test]
    fn infinite_min_score_leaves_labels_unchanged() {
        let (e, t, l) = fixture();
        let outcome = engine(1, f64::INFINITY).run(&e, &t, &l).unwrap();
        assert_eq!(outcome.labels, l);
        assert!(outcome.steps.is_empty());
        assert_eq!(outcome.cluster_count(), 3);
    }

    #[test]
    fn target_reached_stops_merging() {
        let (e, t, l) = fixture();
        let outcome = engine(3, 0.0).run(&e, &t, &l).unwrap();
        assert!(outcome.steps.is_empty());
    }

    #[test]
    fn merging_to_one_keeps_noise() {
        let (e, t, l) = fixture();
        let outcome = engine(1, f64::NEG_INFINITY).run(&e, &t, &l).unwrap();
        assert_eq!(outcome.labels, vec![0, 0, 0, 0, 0, 0, NOISE]);
        assert_eq!(outcome.history.roots().len(), 1);
        let counts: Vec<usize> = outcome.steps.iter().map(|s| s.clusters_after).collect();
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn cohesion_floor_vetoes_loose_merge() {
        let (e, t, l) = fixture();
        let mut config = MergeConfig {
            target_clusters: 1,
            min_score: f64::NEG_INFINITY,
            ..MergeConfig::default()
        };
        config.cohesion_floor = Some(0.9);
        let engine = MergeEngine::new(config, KeywordExtractor::default());
        let outcome = engine.run(&e, &t, &l).unwrap();
        // The two pipeline groups fold; the orthogonal group is vetoed.
        assert_eq!(outcome.cluster_count(), 2);
        assert!(outcome.vetoed >= 1);
    }

    #[test]
    fn overlap_uses_reported_keyword_count() {
        let (e, t, l) = fixture();
        let keyword_config = KeywordConfig {
            top_n: 3,
            ..KeywordConfig::default()
        };
        let config = MergeConfig {
            target_clusters: 2,
            min_score: 0.0,
            ..MergeConfig::default()
        };
        let engine = MergeEngine::new(config, KeywordExtractor::new(&keyword_config));
        let outcome = engine.run(&e, &t, &l).unwrap();
        assert_eq!(outcome.steps.len(), 1);
        assert!(outcome.keywords.values().all(|k| k.len() == 3));

        let index = engine.extractor().index(&t);
        let a: BTreeSet<String> = index.top_terms(&[0, 1], 3).into_iter().collect();
        let b: BTreeSet<String> = index.top_terms(&[2, 3], 3).into_iter().collect();
        let expected = a.intersection(&b).count() as f64 / a.union(&b).count() as f64;
        assert!((outcome.steps[0].keyword_overlap - expected).abs() < 1e-12);
    }

    #[test]
    fn label_count_mismatch_is_rejected() {
        let (e, t, _) = fixture();
        assert!(engine(2, 0.0).run(&e, &t, &[0, 1]).is_err());
    }

    #[test]
    fn runs_are_deterministic() {
        let (e, t, l) = fixture();
        let a = engine(1, f64::NEG_INFINITY).run(&e, &t, &l).unwrap();
        let b = engine(1, f64::NEG_INFINITY).run(&e, &t, &l).unwrap();
        assert_eq!(a, b);
    }
}
