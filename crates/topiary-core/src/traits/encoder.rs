use crate::errors::TopiaryResult;

/// Black-box text encoder producing fixed-length vectors.
pub trait IEncoder: Send + Sync {
    /// Encode a single text.
    fn encode(&self, text: &str) -> TopiaryResult<Vec<f32>>;

    /// Encode a batch of texts.
    fn encode_batch(&self, texts: &[String]) -> TopiaryResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }

    /// The dimensionality of vectors produced by this encoder.
    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;
}
