//! Scripted stand-ins for an LLM summarizer.

use std::sync::atomic::{AtomicUsize, Ordering};

use topiary_core::errors::{SummarizerError, TopiaryResult};
use topiary_core::models::SummaryRequest;
use topiary_core::traits::ISummarizer;

fn answer(topic_ids: impl Iterator<Item = String>) -> String {
    let map: serde_json::Map<String, serde_json::Value> = topic_ids
        .map(|id| {
            let sentence = format!("Discussion about {id}.");
            (id, serde_json::Value::String(sentence))
        })
        .collect();
    serde_json::Value::Object(map).to_string()
}

/// Answers every topic with `"Discussion about <id>."`, optionally wrapped
/// in a markdown fence.
#[derive(Debug, Default)]
pub struct ScriptedSummarizer {
    fenced: bool,
    calls: AtomicUsize,
}

impl ScriptedSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fenced() -> Self {
        Self {
            fenced: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ISummarizer for ScriptedSummarizer {
    fn summarize(&self, request: &SummaryRequest) -> TopiaryResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = answer(request.topic_ids().cloned());
        Ok(if self.fenced {
            format!("```json\n{body}\n```")
        } else {
            body
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Always returns prose instead of JSON.
#[derive(Debug, Default)]
pub struct MalformedSummarizer;

impl ISummarizer for MalformedSummarizer {
    fn summarize(&self, _request: &SummaryRequest) -> TopiaryResult<String> {
        Ok("Sure! Here are some summaries of your topics.".to_string())
    }

    fn name(&self) -> &str {
        "malformed"
    }
}

/// Every call fails.
#[derive(Debug, Default)]
pub struct FailingSummarizer {
    calls: AtomicUsize,
}

impl FailingSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ISummarizer for FailingSummarizer {
    fn summarize(&self, _request: &SummaryRequest) -> TopiaryResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SummarizerError::CallFailed {
            reason: "upstream unavailable".to_string(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Batch calls answer only every other topic; single-topic calls succeed.
#[derive(Debug, Default)]
pub struct PartialSummarizer {
    calls: AtomicUsize,
}

impl PartialSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ISummarizer for PartialSummarizer {
    fn summarize(&self, request: &SummaryRequest) -> TopiaryResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.topics.len() == 1 {
            return Ok(answer(request.topic_ids().cloned()));
        }
        Ok(answer(request.topic_ids().step_by(2).cloned()))
    }

    fn name(&self) -> &str {
        "partial"
    }
}
