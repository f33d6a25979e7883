use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Grouped sample texts per topic id, sent to the summarizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub topics: BTreeMap<String, Vec<String>>,
}

impl SummaryRequest {
    pub fn topic_ids(&self) -> impl Iterator<Item = &String> {
        self.topics.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Request restricted to one topic, for per-topic retries.
    pub fn single(&self, topic_id: &str) -> Option<SummaryRequest> {
        let samples = self.topics.get(topic_id)?;
        Some(SummaryRequest {
            topics: BTreeMap::from([(topic_id.to_string(), samples.clone())]),
        })
    }
}

/// A topic the summarizer could not label. The raw response is kept so a
/// human can recover whatever the model returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFailure {
    pub topic_id: String,
    pub error: String,
    pub raw: Option<String>,
    pub attempts: usize,
}

/// Per-topic summarization outcome for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub summaries: BTreeMap<String, String>,
    pub failures: Vec<SummaryFailure>,
}

impl SummaryReport {
    pub fn summary_for(&self, topic_id: &str) -> Option<&str> {
        self.summaries.get(topic_id).map(String::as_str)
    }

    pub fn failure_for(&self, topic_id: &str) -> Option<&SummaryFailure> {
        self.failures.iter().find(|f| f.topic_id == topic_id)
    }
}
