//! Read-only chunk store, loaded from the ingestion snapshot.
//!
//! The ingestion phase (out of scope here) writes two JSON tables: a chunk
//! table and a verse-index table keyed by chunk id. Both are read once at
//! startup; the store is immutable afterwards and safe to share across
//! concurrent queries.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkId, VerseOffsets};

pub struct ChunkStore {
    chunks: HashMap<ChunkId, Chunk>,
}

impl ChunkStore {
    /// Load a snapshot from the chunk table and verse-index table files.
    ///
    /// Verse-index entries for unknown chunks, and offsets that fall outside
    /// a chunk's text, are dropped with a data-quality warning — a flawed
    /// snapshot degrades formatting, it does not prevent retrieval.
    pub fn load(chunks_file: &Path, verse_index_file: &Path) -> Result<Self> {
        let chunk_records: Vec<Chunk> = read_json(chunks_file)?;
        let mut verse_index: HashMap<ChunkId, Vec<VerseOffsets>> = read_json(verse_index_file)?;

        let mut chunks: HashMap<ChunkId, Chunk> = HashMap::with_capacity(chunk_records.len());
        for mut chunk in chunk_records {
            if let Some(offsets) = verse_index.remove(&chunk.id) {
                chunk.verses = validate_offsets(&chunk, offsets);
            }
            if let Some(previous) = chunks.insert(chunk.id.clone(), chunk) {
                warn!(chunk_id = %previous.id, "duplicate chunk id in snapshot, keeping last");
            }
        }
        for orphan in verse_index.keys() {
            warn!(chunk_id = %orphan, "verse index entry without a chunk, ignoring");
        }
        Ok(Self { chunks })
    }

    /// Build a store directly from chunks; used by tests and tools that
    /// already hold the snapshot in memory.
    pub fn from_chunks(records: impl IntoIterator<Item = Chunk>) -> Self {
        let chunks = records.into_iter().map(|c| (c.id.clone(), c)).collect();
        Self { chunks }
    }

    pub fn get(&self, id: &str) -> Option<&Chunk> {
        self.chunks.get(id)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// All verse spans in the snapshot, as (chunk id, verse offsets).
    pub fn verse_spans(&self) -> impl Iterator<Item = (&str, &[VerseOffsets])> {
        self.chunks.values().map(|c| (c.id.as_str(), c.verses.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))
}

fn validate_offsets(chunk: &Chunk, offsets: Vec<VerseOffsets>) -> Vec<VerseOffsets> {
    let mut kept = Vec::with_capacity(offsets.len());
    for v in offsets {
        if v.start <= v.end && chunk.text.get(v.start..v.end).is_some() {
            kept.push(v);
        } else {
            warn!(
                chunk_id = %chunk.id,
                chapter = v.chapter,
                verse = v.verse,
                "verse offsets outside chunk text, dropping entry"
            );
        }
    }
    kept
}
