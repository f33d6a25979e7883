//! Applies an external summarizer to topic nodes.
//!
//! One batched request goes out first; topics it fails to cover are retried
//! one at a time up to `max_retries`. Whatever still fails is recorded with
//! the raw response so nothing the model returned is lost.

use std::collections::BTreeMap;

use topiary_core::config::SummarizerConfig;
use topiary_core::errors::SummarizerError;
use topiary_core::models::{SummaryFailure, SummaryReport, SummaryRequest};
use topiary_core::traits::ISummarizer;
use topiary_core::TopiaryError;
use tracing::{info, warn};

/// Parse `{topic_id: sentence}` out of a model response.
///
/// Markdown code fences are stripped; if the remainder is not JSON, the
/// outermost `{...}` span is tried. Non-string and blank values are dropped.
pub fn parse_response(raw: &str) -> Result<BTreeMap<String, String>, SummarizerError> {
    let text = raw.trim();
    let body = if text.starts_with("```") {
        text.lines()
            .skip(1)
            .take_while(|l| !l.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        text.to_string()
    };

    let value = serde_json::from_str::<serde_json::Value>(&body).or_else(|first| {
        match (body.find('{'), body.rfind('}')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str::<serde_json::Value>(&body[start..=end])
            }
            _ => Err(first),
        }
    });

    match value {
        Ok(serde_json::Value::Object(map)) => Ok(map
            .into_iter()
            .filter_map(|(k, v)| {
                let sentence = v.as_str()?.trim().to_string();
                (!sentence.is_empty()).then_some((k, sentence))
            })
            .collect()),
        Ok(other) => Err(SummarizerError::Unparseable {
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
            raw: raw.to_string(),
        }),
        Err(e) => Err(SummarizerError::Unparseable {
            reason: e.to_string(),
            raw: raw.to_string(),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

struct Pending {
    error: String,
    raw: Option<String>,
    attempts: usize,
}

/// Summarizer plus its retry and sampling policy.
pub struct TopicSummarizer<'a> {
    summarizer: &'a dyn ISummarizer,
    config: SummarizerConfig,
}

impl<'a> TopicSummarizer<'a> {
    pub fn new(summarizer: &'a dyn ISummarizer, config: SummarizerConfig) -> Self {
        Self { summarizer, config }
    }

    /// Cap each topic's samples to the first `max_samples_per_topic`.
    pub fn build_request(&self, samples: &BTreeMap<String, Vec<String>>) -> SummaryRequest {
        SummaryRequest {
            topics: samples
                .iter()
                .map(|(id, texts)| {
                    let capped = texts
                        .iter()
                        .take(self.config.max_samples_per_topic)
                        .cloned()
                        .collect();
                    (id.clone(), capped)
                })
                .collect(),
        }
    }

    /// Summarise every topic in `request`. Never fails as a whole.
    pub fn summarize(&self, request: &SummaryRequest) -> SummaryReport {
        let mut report = SummaryReport::default();
        if request.is_empty() {
            return report;
        }

        let mut pending: BTreeMap<String, Pending> = BTreeMap::new();
        match self.attempt(request) {
            Ok((parsed, raw)) => {
                for topic in request.topic_ids() {
                    match parsed.get(topic) {
                        Some(sentence) => {
                            report.summaries.insert(topic.clone(), sentence.clone());
                        }
                        None => {
                            let error = SummarizerError::MissingTopic {
                                topic_id: topic.clone(),
                            };
                            pending.insert(
                                topic.clone(),
                                Pending {
                                    error: error.to_string(),
                                    raw: Some(raw.clone()),
                                    attempts: 1,
                                },
                            );
                        }
                    }
                }
            }
            Err(e) => {
                warn!(provider = self.summarizer.name(), error = %e, "batched summary request failed");
                for topic in request.topic_ids() {
                    pending.insert(
                        topic.clone(),
                        Pending {
                            error: e.to_string(),
                            raw: e.raw().map(str::to_string),
                            attempts: 1,
                        },
                    );
                }
            }
        }

        for (topic, mut state) in pending {
            let Some(single) = request.single(&topic) else {
                continue;
            };
            let mut done = false;
            for _ in 0..self.config.max_retries {
                state.attempts += 1;
                match self.attempt(&single) {
                    Ok((parsed, raw)) => match parsed.get(&topic) {
                        Some(sentence) => {
                            report.summaries.insert(topic.clone(), sentence.clone());
                            done = true;
                            break;
                        }
                        None => {
                            state.error = SummarizerError::MissingTopic {
                                topic_id: topic.clone(),
                            }
                            .to_string();
                            state.raw = Some(raw);
                        }
                    },
                    Err(e) => {
                        state.error = e.to_string();
                        if let Some(raw) = e.raw() {
                            state.raw = Some(raw.to_string());
                        }
                    }
                }
            }
            if !done {
                warn!(topic = %topic, attempts = state.attempts, error = %state.error, "topic left unsummarised");
                report.failures.push(SummaryFailure {
                    topic_id: topic,
                    error: state.error,
                    raw: state.raw,
                    attempts: state.attempts,
                });
            }
        }

        info!(
            provider = self.summarizer.name(),
            summarised = report.summaries.len(),
            failed = report.failures.len(),
            "summaries collected"
        );
        report
    }

    fn attempt(
        &self,
        request: &SummaryRequest,
    ) -> Result<(BTreeMap<String, String>, String), SummarizerError> {
        let raw = self.summarizer.summarize(request).map_err(|e| match e {
            TopiaryError::Summarizer(inner) => inner,
            other => SummarizerError::CallFailed {
                reason: other.to_string(),
            },
        })?;
        let parsed = parse_response(&raw)?;
        Ok((parsed, raw))
    }
}
