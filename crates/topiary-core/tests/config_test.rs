use std::io::Write;

use topiary_core::config::*;
use topiary_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = TopiaryConfig::from_toml("").unwrap();

    assert_eq!(config.store.projection_components, None);

    assert_eq!(config.density.algorithm, DensityAlgorithm::Dbscan);
    assert_eq!(config.density.eps, 0.3);
    assert_eq!(config.density.min_samples, 5);
    assert_eq!(config.density.metric, DistanceMetric::Cosine);

    assert_eq!(config.keywords.top_n, 10);
    assert_eq!(config.keywords.min_token_len, 3);

    assert_eq!(config.merge.target_clusters, 20);
    assert_eq!(config.merge.alpha, 0.6);
    assert_eq!(config.merge.beta, 0.3);
    assert_eq!(config.merge.gamma, 0.1);
    assert_eq!(config.merge.min_score, 0.5);
    assert_eq!(config.merge.normalization, ScoreNormalization::Bounded);
    assert_eq!(config.merge.cohesion_floor, None);

    assert_eq!(config.hierarchy.linkage, Linkage::Average);
    assert_eq!(config.hierarchy.levels, 5);

    assert_eq!(config.evaluation.weights.cohesion, 0.4);
    assert_eq!(config.evaluation.weights.dispersion, 0.3);
    assert_eq!(config.evaluation.weights.cluster_count, 0.1);
    assert_eq!(config.evaluation.weights.outliers, 0.2);

    assert_eq!(config.calibration.top_k, 5);
    assert!(config.calibration.parallel);
    assert_eq!(config.summarizer.max_samples_per_topic, 8);
    assert!(config.grouping.is_empty());
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[density]
algorithm = "hdbscan"
eps = 0.12
metric = "euclidean"

[merge]
target_clusters = 3
normalization = "zscore"
cohesion_floor = 0.2

[hierarchy]
linkage = "ward"
thresholds = [0.1, 0.4, 0.9]

[calibration]
alpha = [0.5]
min_score = [0.3, 0.7]

[[grouping.assignments]]
from = 4
to = 1

[[grouping.assignments]]
from = 6
to = 1
"#;
    let config = TopiaryConfig::from_toml(toml).unwrap();
    config.validate().unwrap();

    assert_eq!(config.density.algorithm, DensityAlgorithm::Hdbscan);
    assert_eq!(config.density.eps, 0.12);
    assert_eq!(config.density.metric, DistanceMetric::Euclidean);
    // Untouched fields keep defaults.
    assert_eq!(config.density.min_samples, 5);

    assert_eq!(config.merge.target_clusters, 3);
    assert_eq!(config.merge.normalization, ScoreNormalization::ZScore);
    assert_eq!(config.merge.cohesion_floor, Some(0.2));
    assert_eq!(config.hierarchy.linkage, Linkage::Ward);
    assert_eq!(config.hierarchy.thresholds, vec![0.1, 0.4, 0.9]);
    assert_eq!(config.calibration.alpha, vec![0.5]);
    assert_eq!(config.calibration.beta, vec![0.1, 0.3, 0.5]);

    let map = config.grouping.as_map();
    assert_eq!(map.get(&4), Some(&1));
    assert_eq!(map.get(&6), Some(&1));
}

#[test]
fn unknown_keys_are_ignored() {
    let config = TopiaryConfig::from_toml(
        r#"
[density]
eps = 0.2
future_knob = true
"#,
    )
    .unwrap();
    assert_eq!(config.density.eps, 0.2);
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = TopiaryConfig::from_toml("[density\neps = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn load_reads_and_validates_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[merge]\ntarget_clusters = 4").unwrap();
    let config = TopiaryConfig::load(file.path()).unwrap();
    assert_eq!(config.merge.target_clusters, 4);
}

#[test]
fn load_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[density]\neps = 0.0").unwrap();
    let err = TopiaryConfig::load(file.path()).unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "density.eps"),
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn load_missing_file_is_read_error() {
    let err = TopiaryConfig::load(std::path::Path::new("/nonexistent/topiary.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
}

#[test]
fn zero_composite_weights_rejected() {
    let weights = CompositeWeights {
        cohesion: 0.0,
        dispersion: 0.0,
        cluster_count: 0.0,
        outliers: 0.0,
    };
    assert!(validate_weights(&weights).is_err());
}

#[test]
fn descending_thresholds_rejected() {
    let mut config = TopiaryConfig::default();
    config.hierarchy.thresholds = vec![0.5, 0.2];
    assert!(config.validate().is_err());
}
