//! In-memory vector store: owns chunk identity, text, and embeddings for
//! the lifetime of a run. Everything downstream reads slices of it.

pub mod projection;

use std::collections::{HashMap, HashSet};

use topiary_core::errors::{InputShapeError, TopiaryResult};
use topiary_core::models::Chunk;
use topiary_core::traits::{ICorpusLoader, IEncoder};
use tracing::info;

use crate::algorithms::similarity;

/// Column-oriented store of `(id, text, embedding)` triples.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    ids: Vec<u64>,
    texts: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    positions: HashMap<u64, usize>,
    dimension: usize,
}

impl VectorStore {
    /// Build from loader output; ids are assigned by position.
    pub fn from_pairs(pairs: Vec<(String, Vec<f32>)>) -> TopiaryResult<Self> {
        let (texts, embeddings): (Vec<String>, Vec<Vec<f32>>) = pairs.into_iter().unzip();
        Self::from_parts(texts, embeddings)
    }

    /// Build from co-indexed text and embedding columns.
    pub fn from_parts(texts: Vec<String>, embeddings: Vec<Vec<f32>>) -> TopiaryResult<Self> {
        if texts.len() != embeddings.len() {
            return Err(InputShapeError::CountMismatch {
                texts: texts.len(),
                embeddings: embeddings.len(),
            }
            .into());
        }
        let ids = (0..texts.len() as u64).collect();
        Self::build(ids, texts, embeddings)
    }

    /// Build from chunks carrying explicit ids.
    pub fn from_chunks(chunks: Vec<Chunk>) -> TopiaryResult<Self> {
        let mut ids = Vec::with_capacity(chunks.len());
        let mut texts = Vec::with_capacity(chunks.len());
        let mut embeddings = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            ids.push(chunk.id);
            texts.push(chunk.text);
            embeddings.push(chunk.embedding);
        }
        Self::build(ids, texts, embeddings)
    }

    /// Pull everything from a corpus loader.
    pub fn load(loader: &dyn ICorpusLoader) -> TopiaryResult<Self> {
        let pairs = loader.load()?;
        info!(loader = loader.name(), chunks = pairs.len(), "corpus loaded");
        Self::from_pairs(pairs)
    }

    /// Embed raw texts with `encoder`; ids are assigned by position.
    pub fn encode(texts: Vec<String>, encoder: &dyn IEncoder) -> TopiaryResult<Self> {
        let embeddings = encoder.encode_batch(&texts)?;
        info!(
            encoder = encoder.name(),
            chunks = texts.len(),
            dimensions = encoder.dimensions(),
            "corpus encoded"
        );
        Self::from_parts(texts, embeddings)
    }

    fn build(ids: Vec<u64>, texts: Vec<String>, embeddings: Vec<Vec<f32>>) -> TopiaryResult<Self> {
        let dimension = similarity::validate_matrix(&embeddings)?;
        let mut seen = HashSet::with_capacity(ids.len());
        for &id in &ids {
            if !seen.insert(id) {
                return Err(InputShapeError::DuplicateId { id }.into());
            }
        }
        let positions = ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
        Ok(Self {
            ids,
            texts,
            embeddings,
            positions,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Embedding width D (0 for an empty store).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    /// Row position of a chunk id.
    pub fn position(&self, id: u64) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Owned copy of one chunk.
    pub fn get(&self, id: u64) -> Option<Chunk> {
        let pos = self.position(id)?;
        Some(Chunk::new(
            id,
            self.texts[pos].clone(),
            self.embeddings[pos].clone(),
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str, &[f32])> {
        self.ids
            .iter()
            .zip(self.texts.iter())
            .zip(self.embeddings.iter())
            .map(|((&id, text), emb)| (id, text.as_str(), emb.as_slice()))
    }

    /// L2-normalised copies of every embedding.
    pub fn normalized(&self) -> Vec<Vec<f32>> {
        self.embeddings
            .iter()
            .map(|e| similarity::l2_normalize(e))
            .collect()
    }

    /// Principal-component projection of the embeddings. Returns the raw
    /// embeddings when `n_components` is at least the current width.
    pub fn project(&self, n_components: usize) -> TopiaryResult<Vec<Vec<f32>>> {
        projection::pca_project(&self.embeddings, n_components)
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.ids
            .into_iter()
            .zip(self.texts)
            .zip(self.embeddings)
            .map(|((id, text), embedding)| Chunk { id, text, embedding })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topiary_core::TopiaryError;

    #[test]
    fn from_pairs_assigns_positional_ids() {
        let store = VectorStore::from_pairs(vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![0.0, 1.0]),
        ])
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.dimension(), 2);
        assert_eq!(store.ids(), &[0, 1]);
        assert_eq!(store.get(1).unwrap().text, "b");
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let err = VectorStore::from_parts(vec!["a".into()], vec![]).unwrap_err();
        assert!(matches!(
            err,
            TopiaryError::InputShape(InputShapeError::CountMismatch { texts: 1, embeddings: 0 })
        ));
    }

    #[test]
    fn inconsistent_dimension_is_rejected() {
        let err = VectorStore::from_pairs(vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![0.0, 1.0, 2.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            TopiaryError::InputShape(InputShapeError::DimensionMismatch { row: 1, .. })
        ));
    }

    #[test]
    fn duplicate_chunk_ids_are_rejected() {
        let err = VectorStore::from_chunks(vec![
            Chunk::new(7, "a", vec![1.0]),
            Chunk::new(7, "b", vec![2.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            TopiaryError::InputShape(InputShapeError::DuplicateId { id: 7 })
        ));
    }

    #[test]
    fn explicit_ids_are_addressable() {
        let store = VectorStore::from_chunks(vec![
            Chunk::new(42, "x", vec![1.0]),
            Chunk::new(9, "y", vec![2.0]),
        ])
        .unwrap();
        assert_eq!(store.position(9), Some(1));
        assert!(store.get(3).is_none());
        let chunks = store.into_chunks();
        assert_eq!(chunks[0].id, 42);
    }
}
