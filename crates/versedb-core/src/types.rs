//! Domain types shared by the query, retrieval and formatting layers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::books::book_index;

pub type ChunkId = String;

/// A single verse reference, e.g. Genesis 1:1.
///
/// Total order follows the corpus: canonical book index first, then chapter,
/// then verse. Books outside the canon sort after all canonical books, by
/// name, so malformed metadata still orders deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self { book: book.into(), chapter, verse }
    }

    fn sort_key(&self) -> (usize, &str, u32, u32) {
        let index = book_index(&self.book).unwrap_or(usize::MAX);
        (index, self.book.as_str(), self.chapter, self.verse)
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl Ord for VerseRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for VerseRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rhetorical mode of a query; also used as the genre label attached to
/// chunks at ingestion time. Closed set — `Generic` is the absence of a
/// stronger signal, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Law,
    Narrative,
    Discourse,
    Prophecy,
    Wisdom,
    Lookup,
    Generic,
}

impl QueryMode {
    pub const ALL: [QueryMode; 7] = [
        QueryMode::Law,
        QueryMode::Narrative,
        QueryMode::Discourse,
        QueryMode::Prophecy,
        QueryMode::Wisdom,
        QueryMode::Lookup,
        QueryMode::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryMode::Law => "law",
            QueryMode::Narrative => "narrative",
            QueryMode::Discourse => "discourse",
            QueryMode::Prophecy => "prophecy",
            QueryMode::Wisdom => "wisdom",
            QueryMode::Lookup => "lookup",
            QueryMode::Generic => "generic",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte offsets of one verse inside a chunk's text.
///
/// Produced at chunking time; chunk windows may start or end mid-verse, the
/// offsets are what let the formatter recover exact verse boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseOffsets {
    pub chapter: u32,
    pub verse: u32,
    pub start: usize,
    pub end: usize,
}

/// A contiguous slice of corpus text spanning one or more verses.
///
/// - `id`: globally unique chunk identifier
/// - `text`: concatenated verse text as embedded
/// - `book` + `chapter_start/verse_start` + `chapter_end/verse_end`: the span
/// - `testament`/`section`: coarse corpus divisions from ingestion
/// - `genre`: dominant mode classification attached at ingestion
/// - `verses`: per-verse byte offsets into `text`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub book: String,
    pub chapter_start: u32,
    pub verse_start: u32,
    pub chapter_end: u32,
    pub verse_end: u32,
    #[serde(default)]
    pub testament: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub genre: Option<QueryMode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verses: Vec<VerseOffsets>,
}

impl Chunk {
    /// First verse of the span.
    pub fn span_start(&self) -> VerseRef {
        VerseRef::new(self.book.clone(), self.chapter_start, self.verse_start)
    }

    /// Human-readable span label: `Genesis 1:1-5` within one chapter,
    /// `Genesis 1:30-2:3` across chapters, `Exodus 20:13` for a single
    /// verse.
    pub fn reference_label(&self) -> String {
        if self.chapter_start == self.chapter_end && self.verse_start == self.verse_end {
            format!("{} {}:{}", self.book, self.chapter_start, self.verse_start)
        } else if self.chapter_start == self.chapter_end {
            format!("{} {}:{}-{}", self.book, self.chapter_start, self.verse_start, self.verse_end)
        } else {
            format!(
                "{} {}:{}-{}:{}",
                self.book, self.chapter_start, self.verse_start, self.chapter_end, self.verse_end
            )
        }
    }
}

/// A raw hit from a vector index: chunk id plus similarity, higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: ChunkId,
    pub similarity: f32,
}

/// One retrieval candidate moving through the rerank stage.
///
/// Request-scoped, never persisted. `signals` records each scoring
/// component's contribution under a stable name so callers can see why a
/// chunk ranked where it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub chunk_id: ChunkId,
    pub similarity: f32,
    pub rerank_score: f32,
    pub signals: BTreeMap<String, f32>,
}

impl Candidate {
    pub fn new(chunk_id: impl Into<ChunkId>, similarity: f32) -> Self {
        Self { chunk_id: chunk_id.into(), similarity, rerank_score: 0.0, signals: BTreeMap::new() }
    }
}

/// One rendered Scripture block: a span label plus verse-attributed texts,
/// in corpus order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBlock {
    pub label: String,
    pub verses: Vec<(VerseRef, String)>,
}
