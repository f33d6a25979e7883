use serde::{Deserialize, Serialize};

/// A bounded text segment paired with its embedding.
/// Immutable once produced by the corpus loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: u64,
    pub text: String,
    pub embedding: Vec<f32>,
}

impl Chunk {
    pub fn new(id: u64, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id,
            text: text.into(),
            embedding,
        }
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
