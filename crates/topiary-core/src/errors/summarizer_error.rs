/// External summarizer failures. Recoverable per topic.
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("summarizer call failed: {reason}")]
    CallFailed { reason: String },

    #[error("unparseable summarizer response: {reason}")]
    Unparseable { reason: String, raw: String },

    #[error("summarizer response is missing topic {topic_id}")]
    MissingTopic { topic_id: String },
}

impl SummarizerError {
    /// Raw response text retained for inspection, when one exists.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Unparseable { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
