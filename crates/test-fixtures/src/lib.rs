//! Shared fixtures for Topiary tests and benches: seeded synthetic corpora,
//! a deterministic hash encoder, and scripted summarizers.

pub mod corpus;
pub mod encoder;
pub mod summarizers;

pub use corpus::{gaussian_blobs, shuffled_labels, BlobSpec, StaticLoader, SyntheticCorpus};
pub use encoder::HashEncoder;
pub use summarizers::{
    FailingSummarizer, MalformedSummarizer, PartialSummarizer, ScriptedSummarizer,
};
