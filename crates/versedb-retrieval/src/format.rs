//! Verse reconstruction and context formatting.
//!
//! Maps ranked chunks back to exact verse spans via the store's verse
//! offsets and renders them as Scripture blocks with citations. Chunk
//! windows overlap by design, so the same verse may appear in several
//! blocks unless deduplication is switched on.

use std::collections::HashSet;

use tracing::{debug, warn};

use versedb_core::config::RetrievalConfig;
use versedb_core::store::ChunkStore;
use versedb_core::types::{Candidate, Chunk, ContextBlock, VerseRef};

/// Build context blocks from ranked candidates.
///
/// Rank order is preserved across blocks; verses inside a block are in
/// corpus order. A candidate whose chunk id is not in the store is skipped
/// with a warning — one bad reference never aborts the response.
pub fn format_context(
    ranked: &[Candidate],
    store: &ChunkStore,
    cfg: &RetrievalConfig,
) -> Vec<ContextBlock> {
    let mut blocks = Vec::new();
    let mut emitted: HashSet<VerseRef> = HashSet::new();

    for (position, cand) in ranked.iter().enumerate() {
        if blocks.len() >= cfg.max_blocks {
            debug!(remaining = ranked.len() - position, "context block cap reached");
            break;
        }
        let Some(chunk) = store.get(&cand.chunk_id) else {
            warn!(chunk_id = %cand.chunk_id, "ranked chunk missing from the store, skipping");
            continue;
        };

        let mut verses = reconstruct_verses(chunk);
        verses.sort_by(|(a, _), (b, _)| a.cmp(b));

        if cfg.dedupe_blocks {
            verses.retain(|(r, _)| !emitted.contains(r));
            if verses.is_empty() {
                debug!(chunk_id = %chunk.id, "all verses already shown, omitting block");
                continue;
            }
            for (r, _) in &verses {
                emitted.insert(r.clone());
            }
        }

        blocks.push(ContextBlock { label: chunk.reference_label(), verses });
    }
    blocks
}

/// Slice each verse out of the chunk text by its recorded offsets. Missing
/// or unusable offsets fall back to the whole chunk text attributed to the
/// start of the span — the original text is still better than nothing.
fn reconstruct_verses(chunk: &Chunk) -> Vec<(VerseRef, String)> {
    if chunk.verses.is_empty() {
        return vec![(chunk.span_start(), chunk.text.trim().to_string())];
    }
    let mut verses = Vec::with_capacity(chunk.verses.len());
    for v in &chunk.verses {
        match chunk.text.get(v.start..v.end) {
            Some(slice) => verses.push((
                VerseRef::new(chunk.book.clone(), v.chapter, v.verse),
                slice.trim().to_string(),
            )),
            None => {
                warn!(
                    chunk_id = %chunk.id,
                    chapter = v.chapter,
                    verse = v.verse,
                    "verse offsets unusable, falling back to whole chunk text"
                );
                return vec![(chunk.span_start(), chunk.text.trim().to_string())];
            }
        }
    }
    verses
}

/// Render blocks as the numbered passage text handed to a downstream
/// answering layer. Stable byte-for-byte for identical input.
pub fn render(blocks: &[ContextBlock]) -> String {
    let mut out = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let verses: Vec<String> =
            block.verses.iter().map(|(r, text)| format!("{} — \"{}\"", r, text)).collect();
        out.push(format!("[Passage {}]\nChunk reference: {}\n{}", i + 1, block.label, verses.join("\n")));
    }
    out.join("\n")
}
