use serde::{Deserialize, Serialize};

use super::defaults;

/// Keyword extractor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Keywords kept per cluster.
    pub top_n: usize,
    /// Tokens shorter than this are dropped.
    pub min_token_len: usize,
    /// Stopwords added to the built-in domain set.
    pub extra_stopwords: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_n: defaults::DEFAULT_TOP_N_KEYWORDS,
            min_token_len: defaults::DEFAULT_MIN_TOKEN_LEN,
            extra_stopwords: Vec::new(),
        }
    }
}
