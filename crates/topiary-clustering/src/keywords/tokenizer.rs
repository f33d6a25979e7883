//! Lowercasing tokenizer that splits on anything non-alphanumeric.

use super::stopwords::Stopwords;

/// Tokens of at least `min_len` characters that are neither pure digits
/// nor stopwords, in text order.
pub fn tokenize(text: &str, min_len: usize, stopwords: &Stopwords) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|raw| !raw.is_empty())
        .map(str::to_lowercase)
        .filter(|w| {
            w.chars().count() >= min_len
                && !w.chars().all(|c| c.is_ascii_digit())
                && !stopwords.contains(w)
        })
        .collect()
}
