//! # topiary-observability
//!
//! Structured logging for the pipeline: subscriber setup, one span per
//! stage, and a small stage-timing recorder surfaced in run artifacts.

pub mod stage_timer;
pub mod tracing_setup;

pub use stage_timer::{StageTimer, StageTiming};
pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter};
