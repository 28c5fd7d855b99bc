//! Exact in-memory vector index.
//!
//! Brute-force cosine over owned rows. Small corpora and tests do not need
//! a persisted ANN index, and the exact scan gives the determinism the
//! retrieval contract promises: identical query, identical results, ties
//! broken by chunk id.

use versedb_core::error::{Error, Result};
use versedb_core::store::ChunkStore;
use versedb_core::traits::{Embedder, VectorIndex};
use versedb_core::types::{ChunkId, ScoredChunk};

#[derive(Default)]
pub struct MemoryIndex {
    rows: Vec<(ChunkId, Vec<f32>)>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<ChunkId>, vector: Vec<f32>) {
        self.rows.push((id.into(), vector));
    }

    /// Embed every chunk in the store once and index the result. The chunk
    /// order is fixed by sorting ids so repeated builds are identical.
    pub fn from_store(store: &ChunkStore, embedder: &dyn Embedder) -> anyhow::Result<Self> {
        let mut chunks: Vec<_> = store.chunks().collect();
        chunks.sort_by(|a, b| a.id.cmp(&b.id));
        let mut index = Self::new();
        for chunk in chunks {
            index.insert(chunk.id.clone(), embedder.embed(&chunk.text)?);
        }
        Ok(index)
    }
}

impl VectorIndex for MemoryIndex {
    fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if self.rows.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let mut hits = Vec::with_capacity(self.rows.len());
        for (id, row) in &self.rows {
            if row.len() != query_vec.len() {
                return Err(Error::Upstream(format!(
                    "dimension mismatch: query {} vs row {}",
                    query_vec.len(),
                    row.len()
                )));
            }
            hits.push(ScoredChunk { chunk_id: id.clone(), similarity: cosine(query_vec, row) });
        }
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.rows.len())
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}
