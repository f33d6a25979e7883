//! End-to-end runs over synthetic blobs.

use std::sync::Arc;

use test_fixtures::{
    gaussian_blobs, shuffled_labels, BlobSpec, FailingSummarizer, ScriptedSummarizer,
    SyntheticCorpus,
};
use topiary_calibration::QualityEvaluator;
use topiary_clustering::VectorStore;
use topiary_core::config::{GroupAssignment, GroupingConfig};
use topiary_core::models::labels;
use topiary_core::{TopiaryConfig, NOISE};
use topiary_hierarchy::TopicTree;
use topiary_pipeline::{PipelineArtifacts, TopicPipeline};

/// Three blobs of 40, 35 and 25 chunks plus 10 noise chunks.
fn corpus() -> SyntheticCorpus {
    gaussian_blobs(&BlobSpec::new(&[40, 35, 25], 10).with_dimension(16))
}

fn pipeline() -> TopicPipeline {
    let mut config = TopiaryConfig::default();
    config.merge.target_clusters = 3;
    TopicPipeline::new(config).unwrap()
}

#[test]
fn three_blobs_become_three_leaves_under_one_root() {
    let c = corpus();
    assert_eq!(c.len(), 110);
    let store = VectorStore::from_pairs(c.pairs()).unwrap();
    let artifacts = pipeline().run(&store).unwrap();

    assert_eq!(artifacts.labels.len(), 110);
    assert_eq!(labels::noise_count(&artifacts.labels), 10);
    assert_eq!(labels::cluster_count(&artifacts.labels), 3);
    assert!(artifacts.merge_steps.is_empty());

    let tree = artifacts.tree.as_ref().unwrap();
    assert_eq!(tree.root().id, "root");
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.leaves_under("root").len(), 3);

    let evaluator = QualityEvaluator::default();
    let shuffled = evaluator
        .evaluate(store.embeddings(), &shuffled_labels(&artifacts.labels, 11))
        .unwrap();
    let scores = evaluator.composite(&[artifacts.evaluation.clone(), shuffled]);
    assert!(scores[0] > scores[1], "{scores:?}");
}

#[test]
fn summaries_label_every_node() {
    let store = VectorStore::from_pairs(corpus().pairs()).unwrap();
    let summarizer = Arc::new(ScriptedSummarizer::fenced());
    let artifacts = pipeline()
        .with_summarizer(summarizer.clone())
        .run(&store)
        .unwrap();

    assert!(artifacts.summary_report.failures.is_empty());
    assert_eq!(summarizer.calls(), 1);
    let tree = artifacts.tree.unwrap();
    for id in tree.node_ids() {
        assert_eq!(tree.find(id).unwrap().summary, format!("Discussion about {id}."));
    }
}

#[test]
fn failed_summaries_fall_back_to_keywords() {
    let store = VectorStore::from_pairs(corpus().pairs()).unwrap();
    let artifacts = pipeline()
        .with_summarizer(Arc::new(FailingSummarizer::default()))
        .run(&store)
        .unwrap();

    let tree = artifacts.tree.unwrap();
    assert_eq!(artifacts.summary_report.failures.len(), tree.node_count());
    let leaf = tree.find("topic-0").unwrap();
    let expected: Vec<&str> = artifacts.keywords[&0].iter().take(5).map(String::as_str).collect();
    assert_eq!(leaf.summary, expected.join(", "));
}

#[test]
fn disabled_summarizer_is_never_called() {
    let store = VectorStore::from_pairs(corpus().pairs()).unwrap();
    let mut config = TopiaryConfig::default();
    config.summarizer.enabled = false;
    let summarizer = Arc::new(ScriptedSummarizer::new());
    let artifacts = TopicPipeline::new(config)
        .unwrap()
        .with_summarizer(summarizer.clone())
        .run(&store)
        .unwrap();
    assert_eq!(summarizer.calls(), 0);
    assert!(artifacts.summary_report.summaries.is_empty());
}

#[test]
fn runs_are_reproducible() {
    let store = VectorStore::from_pairs(corpus().pairs()).unwrap();
    let p = pipeline();
    let (a, b) = (p.run(&store).unwrap(), p.run(&store).unwrap());
    assert_eq!(a.labels, b.labels);
    assert_eq!(a.keywords, b.keywords);
    assert_eq!(a.tree, b.tree);
    assert_eq!(a.cut_table, b.cut_table);
    assert_eq!(a.evaluation, b.evaluation);
}

#[test]
fn all_noise_degrades_without_failing() {
    let c = gaussian_blobs(&BlobSpec::new(&[], 6));
    let store = VectorStore::from_pairs(c.pairs()).unwrap();
    let artifacts = pipeline().run(&store).unwrap();
    assert!(artifacts.labels.iter().all(|&l| l == NOISE));
    assert!(artifacts.tree.is_none());
    assert!(artifacts.cut_table.is_none());
    assert!(artifacts.evaluation.cohesion.is_none());
}

#[test]
fn single_cluster_is_a_one_leaf_tree() {
    let c = gaussian_blobs(&BlobSpec::new(&[15], 0));
    let store = VectorStore::from_pairs(c.pairs()).unwrap();
    let artifacts = pipeline().run(&store).unwrap();
    let tree = artifacts.tree.unwrap();
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.root().id, "topic-0");
    assert!(artifacts.evaluation.is_degenerate());
}

#[test]
fn grouping_table_folds_clusters_before_merging() {
    let c = gaussian_blobs(&BlobSpec::new(&[10, 10, 10], 0));
    let store = VectorStore::from_pairs(c.pairs()).unwrap();
    let mut config = TopiaryConfig::default();
    config.grouping = GroupingConfig {
        assignments: vec![GroupAssignment { from: 2, to: 0 }],
    };
    let artifacts = TopicPipeline::new(config).unwrap().run(&store).unwrap();
    assert_eq!(labels::cluster_count(&artifacts.labels), 2);
    assert_eq!(artifacts.labels[0], artifacts.labels[25]);
    assert_ne!(artifacts.labels[0], artifacts.labels[15]);
}

#[test]
fn artifacts_round_trip_through_disk() {
    let store = VectorStore::from_pairs(corpus().pairs()).unwrap();
    let artifacts = pipeline().run(&store).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("run");

    let written = artifacts.write_json(&out).unwrap();
    assert_eq!(written.len(), 6);
    for name in ["labels.json", "keywords.json", "tree.json", "evaluation.json"] {
        assert!(out.join(name).is_file(), "{name} missing");
    }

    let labels: Vec<i32> =
        serde_json::from_str(&std::fs::read_to_string(out.join("labels.json")).unwrap()).unwrap();
    assert_eq!(labels, artifacts.labels);
    let tree: Option<TopicTree> = PipelineArtifacts::read_tree(&out).unwrap();
    assert_eq!(tree, artifacts.tree);
}

#[test]
fn calibration_runs_from_density_labels() {
    let c = gaussian_blobs(&BlobSpec::new(&[12, 12, 12], 0));
    let store = VectorStore::from_pairs(c.pairs()).unwrap();
    let mut config = TopiaryConfig::default();
    config.calibration.alpha = vec![0.6];
    config.calibration.beta = vec![0.3];
    config.calibration.gamma = vec![0.0, 0.2];
    config.calibration.min_score = vec![0.5, f64::INFINITY];
    let report = TopicPipeline::new(config).unwrap().calibrate(&store).unwrap();
    assert_eq!(report.records.len(), 4);
    assert_eq!(report.top_k.len(), 4.min(report.records.len()));
    assert!(!report.cancelled);
}
