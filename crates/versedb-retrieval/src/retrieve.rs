//! First-pass retrieval: embed the query, delegate nearest-neighbor search
//! to the vector index, shape the hits into candidates.

use versedb_core::error::{Error, Result};
use versedb_core::traits::{Embedder, VectorIndex};
use versedb_core::types::Candidate;

/// Fetch up to `k` candidates for `query_text`, in descending similarity.
///
/// An empty index is a valid state and yields an empty vec. An embedding
/// failure is an upstream error: the caller must be able to distinguish
/// "nothing matched" from "the call failed".
pub fn retrieve(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    query_text: &str,
    k: usize,
) -> Result<Vec<Candidate>> {
    let query_vec = embedder
        .embed(query_text)
        .map_err(|e| Error::Upstream(format!("query embedding: {}", e)))?;
    let hits = index.search(&query_vec, k)?;
    Ok(hits.into_iter().map(|h| Candidate::new(h.chunk_id, h.similarity)).collect())
}
