//! Hybrid reranking.
//!
//! Combines embedding similarity, lexical phrase overlap and query-mode
//! affinity into one score:
//!
//! `rerank_score = w_sim * similarity + w_overlap * overlap + w_mode * affinity`
//!
//! The output is a permutation of the input unless a floor is configured,
//! and every drop below the floor is logged individually. A candidate whose
//! chunk is missing from the store keeps its similarity term and nothing
//! else; data-quality problems degrade one candidate, never the query.

use std::cmp::Ordering;

use tracing::warn;

use versedb_core::config::RetrievalConfig;
use versedb_core::store::ChunkStore;
use versedb_core::types::{Candidate, QueryMode};
use versedb_query::{NormalizedQuery, Normalizer};

pub const SIGNAL_SIMILARITY: &str = "similarity";
pub const SIGNAL_PHRASE_OVERLAP: &str = "phrase_overlap";
pub const SIGNAL_MODE_AFFINITY: &str = "mode_affinity";

pub fn rerank(
    mut candidates: Vec<Candidate>,
    normalized: &NormalizedQuery,
    mode: QueryMode,
    store: &ChunkStore,
    cfg: &RetrievalConfig,
    normalizer: &Normalizer,
) -> Vec<Candidate> {
    for cand in &mut candidates {
        cand.signals.insert(SIGNAL_SIMILARITY.to_string(), cand.similarity);
        match store.get(&cand.chunk_id) {
            Some(chunk) => {
                let overlap = phrase_overlap(&normalized.phrases, &chunk.text, normalizer);
                let affinity = match chunk.genre {
                    Some(genre) if genre == mode => 1.0,
                    _ => cfg.mode_partial_credit,
                };
                cand.signals.insert(SIGNAL_PHRASE_OVERLAP.to_string(), overlap);
                cand.signals.insert(SIGNAL_MODE_AFFINITY.to_string(), affinity);
                cand.rerank_score = cfg.w_sim * cand.similarity
                    + cfg.w_overlap * overlap
                    + cfg.w_mode * affinity;
            }
            None => {
                warn!(
                    chunk_id = %cand.chunk_id,
                    "candidate references a chunk missing from the store, scoring on similarity alone"
                );
                cand.rerank_score = cfg.w_sim * cand.similarity;
            }
        }
    }

    if cfg.min_rerank_score > 0.0 {
        candidates.retain(|cand| {
            if cand.rerank_score >= cfg.min_rerank_score {
                return true;
            }
            warn!(
                chunk_id = %cand.chunk_id,
                rerank_score = cand.rerank_score,
                floor = cfg.min_rerank_score,
                "dropping candidate below rerank floor"
            );
            false
        });
    }

    candidates.sort_by(compare);
    candidates
}

/// Descending rerank score; ties by descending similarity, then ascending
/// chunk id. Total, so identical inputs always order identically.
fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.rerank_score
        .total_cmp(&a.rerank_score)
        .then_with(|| b.similarity.total_cmp(&a.similarity))
        .then_with(|| a.chunk_id.cmp(&b.chunk_id))
}

/// Share of query phrases found verbatim, post-lemmatization, in the chunk
/// text. 0.0 when the query produced no phrases.
fn phrase_overlap(query_phrases: &[String], chunk_text: &str, normalizer: &Normalizer) -> f32 {
    if query_phrases.is_empty() {
        return 0.0;
    }
    let chunk_phrases = normalizer.phrase_set(chunk_text);
    let matched = query_phrases.iter().filter(|p| chunk_phrases.contains(p.as_str())).count();
    matched as f32 / query_phrases.len() as f32
}
