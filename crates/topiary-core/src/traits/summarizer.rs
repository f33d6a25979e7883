use crate::errors::TopiaryResult;
use crate::models::SummaryRequest;

/// External summarizer (typically an LLM) labelling topics with one sentence.
///
/// Returns the raw response text; parsing into `{topic_id: sentence}` and
/// fallback handling happen on the caller's side so unparseable output can
/// be retained.
pub trait ISummarizer: Send + Sync {
    fn summarize(&self, request: &SummaryRequest) -> TopiaryResult<String>;

    fn name(&self) -> &str;
}
