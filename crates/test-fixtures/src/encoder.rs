//! Deterministic blake3-based encoder.

use topiary_core::errors::TopiaryResult;
use topiary_core::traits::IEncoder;

/// Hashes each text into a fixed-width vector in [0, 1].
#[derive(Debug, Clone)]
pub struct HashEncoder {
    dimensions: usize,
}

impl HashEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self::new(32)
    }
}

impl IEncoder for HashEncoder {
    fn encode(&self, text: &str) -> TopiaryResult<Vec<f32>> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(text.as_bytes());
        let mut bytes = vec![0u8; self.dimensions];
        hasher.finalize_xof().fill(&mut bytes);
        Ok(bytes.into_iter().map(|b| b as f32 / 255.0).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_vector() {
        let enc = HashEncoder::new(48);
        let a = enc.encode("quarterly gas forecast").unwrap();
        assert_eq!(a.len(), 48);
        assert_eq!(a, enc.encode("quarterly gas forecast").unwrap());
        assert_ne!(a, enc.encode("holiday party").unwrap());
    }
}
