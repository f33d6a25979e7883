//! Vector math shared across the pipeline.

pub mod similarity;
