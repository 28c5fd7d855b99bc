use crate::error::Result;
use crate::types::ScoredChunk;

/// Embedding capability: turns text into a fixed-dimension vector.
///
/// Implementations are constructed once at startup and shared read-only;
/// they must be safe for concurrent use.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Nearest-neighbor search capability over chunk embeddings.
///
/// `search` returns at most `k` hits in descending similarity. An empty
/// index yields an empty vec, never an error; failures and exceeded time
/// budgets surface as `Error::Upstream` / `Error::Timeout` so the caller
/// can tell them apart from a cold store.
pub trait VectorIndex: Send + Sync {
    fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>>;
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
