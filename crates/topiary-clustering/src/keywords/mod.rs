//! Keyword extraction: TF-IDF weighted against the whole corpus.
//!
//! Each document is weighted `tf * idf` with smoothed idf
//! `ln((1 + N) / (1 + df)) + 1` and L2-normalised; a cluster's keywords are
//! the terms with the highest mean weight over its documents. Noise
//! documents count toward `df` but never produce keywords of their own.

pub mod stopwords;
pub mod tokenizer;

use std::collections::{BTreeMap, HashMap, HashSet};

use topiary_core::config::KeywordConfig;
use topiary_core::errors::{InputShapeError, TopiaryResult};
use topiary_core::models::labels;
use topiary_core::ClusterLabel;
use tracing::debug;

pub use stopwords::Stopwords;

/// Corpus-wide term weights, one sparse vector per document.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    idf: HashMap<String, f64>,
    documents: Vec<HashMap<String, f64>>,
}

impl TermIndex {
    /// Weight every document against the corpus it belongs to.
    pub fn build(texts: &[String], stopwords: &Stopwords, min_token_len: usize) -> Self {
        let tokenized: Vec<Vec<String>> = texts
            .iter()
            .map(|t| tokenizer::tokenize(t, min_token_len, stopwords))
            .collect();

        let mut df: HashMap<String, usize> = HashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&String> = tokens.iter().collect();
            for term in unique {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n_docs = texts.len() as f64;
        let idf: HashMap<String, f64> = df
            .into_iter()
            .map(|(term, freq)| {
                let weight = ((1.0 + n_docs) / (1.0 + freq as f64)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        let documents = tokenized
            .into_iter()
            .map(|tokens| {
                let mut tf: HashMap<String, f64> = HashMap::new();
                for token in tokens {
                    *tf.entry(token).or_insert(0.0) += 1.0;
                }
                let mut weights: HashMap<String, f64> = tf
                    .into_iter()
                    .map(|(term, count)| {
                        let w = count * idf.get(&term).copied().unwrap_or(1.0);
                        (term, w)
                    })
                    .collect();
                let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for w in weights.values_mut() {
                        *w /= norm;
                    }
                }
                weights
            })
            .collect();

        Self { idf, documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Mean document weight of every term over `members`, best first.
    /// Ties resolve alphabetically. Out-of-range members are skipped.
    pub fn ranked_terms(&self, members: &[usize]) -> Vec<(String, f64)> {
        let docs: Vec<&HashMap<String, f64>> = members
            .iter()
            .filter_map(|&m| self.documents.get(m))
            .collect();
        if docs.is_empty() {
            return Vec::new();
        }
        let mut sums: HashMap<&str, f64> = HashMap::new();
        for doc in &docs {
            for (term, w) in doc.iter() {
                *sums.entry(term.as_str()).or_insert(0.0) += w;
            }
        }
        let n = docs.len() as f64;
        let mut ranked: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(term, sum)| (term.to_string(), sum / n))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// The `n` best terms over `members`.
    pub fn top_terms(&self, members: &[usize], n: usize) -> Vec<String> {
        self.ranked_terms(members)
            .into_iter()
            .take(n)
            .map(|(term, _)| term)
            .collect()
    }
}

/// Per-cluster keyword extraction configured by [`KeywordConfig`].
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords: Stopwords,
    min_token_len: usize,
    top_n: usize,
}

impl KeywordExtractor {
    pub fn new(config: &KeywordConfig) -> Self {
        Self {
            stopwords: Stopwords::domain().with_extra(&config.extra_stopwords),
            min_token_len: config.min_token_len,
            top_n: config.top_n,
        }
    }

    /// Replace the stopword set wholesale.
    pub fn with_stopwords(mut self, stopwords: Stopwords) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn index(&self, texts: &[String]) -> TermIndex {
        TermIndex::build(texts, &self.stopwords, self.min_token_len)
    }

    /// `cluster_id -> top terms` for every non-noise label.
    pub fn extract(
        &self,
        texts: &[String],
        labels: &[ClusterLabel],
        top_n: usize,
    ) -> TopiaryResult<BTreeMap<ClusterLabel, Vec<String>>> {
        let index = self.index(texts);
        self.extract_with_index(&index, labels, top_n)
    }

    /// As [`extract`](Self::extract), reusing a prebuilt index.
    pub fn extract_with_index(
        &self,
        index: &TermIndex,
        labels: &[ClusterLabel],
        top_n: usize,
    ) -> TopiaryResult<BTreeMap<ClusterLabel, Vec<String>>> {
        if labels.len() != index.len() {
            return Err(InputShapeError::LabelCountMismatch {
                expected: index.len(),
                actual: labels.len(),
            }
            .into());
        }
        let keywords: BTreeMap<ClusterLabel, Vec<String>> = labels::group_indices(labels)
            .into_iter()
            .map(|(label, members)| (label, index.top_terms(&members, top_n)))
            .collect();
        debug!(
            clusters = keywords.len(),
            vocabulary = index.vocabulary_size(),
            "keywords extracted"
        );
        Ok(keywords)
    }

    /// Keywords for an arbitrary member subset against the corpus index.
    pub fn keywords_for(&self, index: &TermIndex, members: &[usize]) -> Vec<String> {
        index.top_terms(members, self.top_n)
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(&KeywordConfig::default())
    }
}
