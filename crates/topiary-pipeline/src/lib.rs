//! # topiary-pipeline
//!
//! Orchestrates a full run over a [`VectorStore`](topiary_clustering::VectorStore):
//! projection, density clustering, manual grouping, merging, dendrogram and
//! cut table, topic tree, summaries, and evaluation. Also drives
//! calibration from the same density labels.

pub mod artifacts;
pub mod pipeline;

pub use artifacts::PipelineArtifacts;
pub use pipeline::TopicPipeline;
