//! Shared data model.

pub mod chunk;
pub mod evaluation;
pub mod float_serde;
pub mod labels;
pub mod merge_history;
pub mod merge_step;
pub mod summary;
pub mod topic_tree;

pub use chunk::Chunk;
pub use evaluation::{EvaluationRecord, MergeParams, QualityReport};
pub use labels::{ClusterLabel, NOISE};
pub use merge_history::{HistoryNode, MergeHistory};
pub use merge_step::MergeStep;
pub use summary::{SummaryFailure, SummaryReport, SummaryRequest};
pub use topic_tree::TopicTreeNode;
