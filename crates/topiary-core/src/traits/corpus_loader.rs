use crate::errors::TopiaryResult;

/// Source of `(chunk_text, embedding)` pairs, in corpus order.
pub trait ICorpusLoader: Send + Sync {
    fn load(&self) -> TopiaryResult<Vec<(String, Vec<f32>)>>;

    /// Human-readable loader name.
    fn name(&self) -> &str;
}
