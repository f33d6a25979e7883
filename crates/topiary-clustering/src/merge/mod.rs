//! Greedy cluster merging under a composite score.

pub mod engine;
pub mod score;

pub use engine::{MergeEngine, MergeOutcome};
pub use score::{PairComponents, ScoreNormalizer};
