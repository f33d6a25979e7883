//! # topiary-hierarchy
//!
//! Agglomerates cluster medoids (or replays a merge history) into a
//! dendrogram, cuts it at one or many heights, and assembles the labelled
//! topic tree. Summaries from an external summarizer are applied last,
//! with keyword fallbacks for any topic that could not be summarised.

pub mod cuts;
pub mod dendrogram;
pub mod linkage;
pub mod medoids;
pub mod summarize;
pub mod topic_tree;

pub use cuts::{CutRow, CutTable};
pub use dendrogram::{Dendrogram, DendrogramNode};
pub use medoids::{medoid_indices, medoid_vectors};
pub use summarize::TopicSummarizer;
pub use topic_tree::TopicTree;
