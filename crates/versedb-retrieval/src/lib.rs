#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Retrieval pipeline: normalize, classify, retrieve, rerank, format.
//!
//! Everything here is request-scoped; the chunk store, embedder and vector
//! index are shared immutably and the pipeline holds no other state, so
//! concurrent queries never interact.

use std::sync::Arc;

use versedb_core::config::RetrievalConfig;
use versedb_core::error::Result;
use versedb_core::store::ChunkStore;
use versedb_core::traits::{Embedder, VectorIndex};
use versedb_core::types::{Candidate, ContextBlock, QueryMode};
use versedb_query::{classify, NormalizedQuery, Normalizer};

pub mod format;
pub mod rerank;
pub mod retrieve;

pub use format::{format_context, render};
pub use rerank::rerank;
pub use retrieve::retrieve;

pub struct RetrievalPipeline {
    store: Arc<ChunkStore>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    cfg: RetrievalConfig,
    normalizer: Normalizer,
}

impl RetrievalPipeline {
    /// Configuration is validated eagerly; a bad weight never reaches a
    /// query.
    pub fn new(
        store: Arc<ChunkStore>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        cfg: RetrievalConfig,
    ) -> Result<Self> {
        cfg.validate()?;
        let normalizer = Normalizer::new(cfg.ngram_min, cfg.ngram_max);
        Ok(Self { store, embedder, index, cfg, normalizer })
    }

    pub fn normalize(&self, raw: &str) -> NormalizedQuery {
        self.normalizer.normalize(raw)
    }

    pub fn mode(&self, normalized: &NormalizedQuery) -> QueryMode {
        classify(normalized, &self.cfg.mode_priority)
    }

    /// Reranked candidates for a raw query.
    pub fn candidates(&self, raw: &str) -> Result<Vec<Candidate>> {
        let normalized = self.normalize(raw);
        let mode = self.mode(&normalized);
        let embed_text = if self.cfg.embed_normalized { normalized.text.as_str() } else { raw };
        let retrieved =
            retrieve(self.embedder.as_ref(), self.index.as_ref(), embed_text, self.cfg.top_k)?;
        Ok(rerank(retrieved, &normalized, mode, &self.store, &self.cfg, &self.normalizer))
    }

    /// Formatted Scripture context for a raw query. An empty index or an
    /// empty store yields an empty sequence, not an error.
    pub fn context(&self, raw: &str) -> Result<Vec<ContextBlock>> {
        let ranked = self.candidates(raw)?;
        Ok(format_context(&ranked, &self.store, &self.cfg))
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.cfg
    }
}
