//! Integration tests: store -> density -> keywords -> merge on synthetic blobs.

use test_fixtures::{gaussian_blobs, BlobSpec, HashEncoder, StaticLoader};
use topiary_clustering::{DensityClusterer, KeywordExtractor, MergeEngine, VectorStore};
use topiary_core::config::{DensityConfig, KeywordConfig, MergeConfig, ScoreNormalization};
use topiary_core::models::labels;
use topiary_core::NOISE;

fn corpus() -> test_fixtures::SyntheticCorpus {
    gaussian_blobs(&BlobSpec::new(&[40, 35, 25], 10).with_dimension(16))
}

#[test]
fn store_loads_from_loader() {
    let c = corpus();
    let store = VectorStore::load(&StaticLoader::new(c.pairs())).unwrap();
    assert_eq!(store.len(), c.len());
    assert_eq!(store.dimension(), 16);
    assert_eq!(store.texts()[0], c.texts[0]);
}

#[test]
fn store_encodes_raw_texts() {
    let c = corpus();
    let store = VectorStore::encode(c.texts.clone(), &HashEncoder::new(24)).unwrap();
    assert_eq!(store.len(), c.len());
    assert_eq!(store.dimension(), 24);
    assert_eq!(store.ids()[3], 3);
}

#[test]
fn dbscan_recovers_blobs_and_noise() {
    let c = corpus();
    let labels = DensityClusterer::new(DensityConfig::default())
        .cluster(&c.embeddings)
        .unwrap();
    assert_eq!(labels::cluster_count(&labels), 3);
    assert_eq!(labels::noise_count(&labels), 10);
    // Density labels match ground truth up to renaming; blobs come in order.
    assert_eq!(labels, c.truth);
}

#[test]
fn projection_keeps_clusters_separable() {
    let c = gaussian_blobs(&BlobSpec::new(&[40, 35, 25], 0).with_dimension(16));
    let store = VectorStore::from_pairs(c.pairs()).unwrap();
    let projected = store.project(4).unwrap();
    assert_eq!(projected[0].len(), 4);
    let config = DensityConfig {
        metric: topiary_core::config::DistanceMetric::Euclidean,
        eps: 3.0,
        ..DensityConfig::default()
    };
    let labels = DensityClusterer::new(config).cluster(&projected).unwrap();
    assert_eq!(labels::cluster_count(&labels), 3);
}

#[test]
fn keywords_reflect_topic_vocabulary() {
    let c = corpus();
    let kw = KeywordExtractor::new(&KeywordConfig::default())
        .extract(&c.texts, &c.truth, 5)
        .unwrap();
    assert_eq!(kw.len(), 3);
    let topic_zero = ["pipeline", "capacity", "tariff", "compressor", "throughput", "interstate", "natural", "gas"];
    assert!(kw[&0].iter().all(|w| topic_zero.contains(&w.as_str())));
    // Filler words appear in every topic and never lead.
    assert_ne!(kw[&1][0], "update");
}

#[test]
fn target_equal_to_cluster_count_is_a_no_op() {
    let c = corpus();
    let config = MergeConfig {
        target_clusters: 3,
        min_score: 0.0,
        ..MergeConfig::default()
    };
    let outcome = MergeEngine::new(config, KeywordExtractor::default())
        .run(&c.embeddings, &c.texts, &c.truth)
        .unwrap();
    assert_eq!(outcome.labels, c.truth);
    assert_eq!(outcome.cluster_count(), 3);
    assert!(outcome.overall_cohesion > 0.9);
}

#[test]
fn every_normalization_merges_down_to_target() {
    let c = corpus();
    for normalization in [
        ScoreNormalization::Bounded,
        ScoreNormalization::MinMax,
        ScoreNormalization::ZScore,
    ] {
        let config = MergeConfig {
            target_clusters: 1,
            min_score: f64::NEG_INFINITY,
            normalization,
            ..MergeConfig::default()
        };
        let outcome = MergeEngine::new(config, KeywordExtractor::default())
            .run(&c.embeddings, &c.texts, &c.truth)
            .unwrap();
        assert_eq!(outcome.cluster_count(), 1, "{normalization:?}");
        assert_eq!(labels::noise_count(&outcome.labels), 10);
        assert!(outcome.labels.iter().all(|&l| l == 0 || l == NOISE));
    }
}

#[test]
fn unrelated_blobs_score_below_default_min_score() {
    let c = corpus();
    let config = MergeConfig {
        target_clusters: 1,
        ..MergeConfig::default()
    };
    let outcome = MergeEngine::new(config, KeywordExtractor::default())
        .run(&c.embeddings, &c.texts, &c.truth)
        .unwrap();
    assert!(outcome.steps.is_empty());
    assert_eq!(outcome.cluster_count(), 3);
}
