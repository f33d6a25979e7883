//! Span definitions per stage: store, density, keywords, merge, tree,
//! summarize, evaluation, calibration, pipeline.
//!
//! Each span carries the stage's sizing metadata via the `tracing` crate.

/// Create a vector store span.
#[macro_export]
macro_rules! store_span {
    ($chunks:expr, $dimension:expr) => {
        tracing::info_span!("topiary.store", chunks = $chunks, dimension = $dimension)
    };
}

/// Create a density clustering span.
#[macro_export]
macro_rules! density_span {
    ($points:expr, $algorithm:expr) => {
        tracing::info_span!("topiary.density", points = $points, algorithm = ?$algorithm)
    };
}

/// Create a cluster merge span.
#[macro_export]
macro_rules! merge_span {
    ($clusters:expr, $target:expr) => {
        tracing::info_span!("topiary.merge", clusters = $clusters, target = $target)
    };
}

/// Create a tree building span.
#[macro_export]
macro_rules! tree_span {
    ($leaves:expr) => {
        tracing::info_span!("topiary.tree", leaves = $leaves)
    };
}

/// Create a summarization span.
#[macro_export]
macro_rules! summarize_span {
    ($provider:expr, $topics:expr) => {
        tracing::info_span!("topiary.summarize", provider = %$provider, topics = $topics)
    };
}

/// Create a calibration span.
#[macro_export]
macro_rules! calibration_span {
    ($trials:expr) => {
        tracing::info_span!("topiary.calibration", trials = $trials)
    };
}

/// Create a pipeline span.
#[macro_export]
macro_rules! pipeline_span {
    ($chunks:expr) => {
        tracing::info_span!("topiary.pipeline", chunks = $chunks)
    };
}

