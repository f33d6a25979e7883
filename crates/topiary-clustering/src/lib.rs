//! # topiary-clustering
//!
//! Vector store → density clustering → keyword extraction → greedy merge.
//! The merge engine folds density clusters together under a composite
//! cohesion / keyword-overlap / size-balance score until a target count is
//! reached or no pair scores high enough.

pub mod algorithms;
pub mod density;
pub mod grouping;
pub mod keywords;
pub mod merge;
pub mod store;

pub use density::{ClusterSummary, DensityClusterer};
pub use grouping::apply_grouping;
pub use keywords::{KeywordExtractor, Stopwords, TermIndex};
pub use merge::{MergeEngine, MergeOutcome};
pub use store::VectorStore;
