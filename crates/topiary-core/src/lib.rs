//! # topiary-core
//!
//! Foundation crate for the Topiary topic-hierarchy pipeline.
//! Defines chunk and label types, the shared data model, traits for the
//! external collaborators, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TopiaryConfig;
pub use errors::{TopiaryError, TopiaryResult};
pub use models::{Chunk, ClusterLabel, NOISE};
