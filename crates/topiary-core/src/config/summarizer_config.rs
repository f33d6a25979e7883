use serde::{Deserialize, Serialize};

use super::defaults;

/// External summarizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub enabled: bool,
    /// Sample texts sent per topic.
    pub max_samples_per_topic: usize,
    /// Per-topic retries after the batched call.
    pub max_retries: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_SUMMARIZER_ENABLED,
            max_samples_per_topic: defaults::DEFAULT_MAX_SAMPLES_PER_TOPIC,
            max_retries: defaults::DEFAULT_SUMMARIZER_MAX_RETRIES,
        }
    }
}
