//! Medoids to dendrogram to cut table to topic tree, on synthetic blobs.

use std::collections::BTreeMap;

use test_fixtures::{gaussian_blobs, BlobSpec, ScriptedSummarizer};
use topiary_clustering::KeywordExtractor;
use topiary_core::config::{Linkage, SummarizerConfig};
use topiary_hierarchy::{medoid_vectors, Dendrogram, TopicSummarizer, TopicTree};

fn build() -> (TopicTree, Dendrogram) {
    let corpus = gaussian_blobs(&BlobSpec::new(&[30, 20, 15], 0).with_dimension(16));
    let medoids = medoid_vectors(&corpus.embeddings, &corpus.truth);
    assert_eq!(medoids.len(), 3);

    let dendrogram = Dendrogram::from_medoids(&medoids, Linkage::Average).unwrap();
    let table = dendrogram.cut_table(&dendrogram.auto_thresholds(3));
    let keywords = KeywordExtractor::default()
        .extract(&corpus.texts, &corpus.truth, 5)
        .unwrap();
    (TopicTree::from_cut_table(&table, &keywords).unwrap(), dendrogram)
}

#[test]
fn three_blobs_make_a_rooted_tree() {
    let (tree, dendrogram) = build();
    assert_eq!(dendrogram.roots().len(), 1);
    assert_eq!(dendrogram.merges().len(), 2);

    assert_eq!(tree.root().id, "root");
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.depth(), 2);
    let mut leaves = tree.leaf_ids();
    leaves.sort_unstable();
    assert_eq!(leaves, vec!["topic-0", "topic-1", "topic-2"]);
    for id in tree.node_ids() {
        assert!(!tree.find(id).unwrap().summary.is_empty(), "{id} has no summary");
    }
}

#[test]
fn cut_rows_coarsen_monotonically() {
    let (_, dendrogram) = build();
    let table = dendrogram.cut_table(&dendrogram.auto_thresholds(5));
    let counts: Vec<usize> = table.rows().iter().map(|r| r.n_groups).collect();
    assert!(counts.windows(2).all(|w| w[1] < w[0]), "{counts:?}");
    assert_eq!(table.coarsest().map(|r| r.n_groups), Some(1));
}

#[test]
fn tree_json_round_trips() {
    let (tree, _) = build();
    let json = tree.to_json().unwrap();
    assert_eq!(TopicTree::from_json(&json).unwrap(), tree);
}

#[test]
fn summaries_replace_keyword_labels() {
    let (tree, _) = build();
    let samples: BTreeMap<String, Vec<String>> = tree
        .node_ids()
        .into_iter()
        .map(|id| (id.to_string(), vec![format!("text under {id}")]))
        .collect();

    let scripted = ScriptedSummarizer::new();
    let summarizer = TopicSummarizer::new(&scripted, SummarizerConfig::default());
    let report = summarizer.summarize(&summarizer.build_request(&samples));
    assert!(report.failures.is_empty());

    let tree = tree.with_summaries(&report.summaries);
    assert_eq!(
        tree.find("root").map(|n| n.summary.as_str()),
        Some("Discussion about root.")
    );
    assert_eq!(scripted.calls(), 1);
}
