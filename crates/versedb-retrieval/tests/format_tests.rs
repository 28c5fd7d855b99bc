use versedb_core::config::RetrievalConfig;
use versedb_core::store::ChunkStore;
use versedb_core::types::{Candidate, Chunk, QueryMode, VerseOffsets, VerseRef};
use versedb_retrieval::{format_context, render};

fn chunk_from_verses(
    id: &str,
    book: &str,
    chapter: u32,
    verses: &[(u32, &str)],
    genre: Option<QueryMode>,
) -> Chunk {
    let mut text = String::new();
    let mut offsets = Vec::new();
    for (i, (verse, verse_text)) in verses.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        let start = text.len();
        text.push_str(verse_text);
        offsets.push(VerseOffsets { chapter, verse: *verse, start, end: text.len() });
    }
    Chunk {
        id: id.to_string(),
        text,
        book: book.to_string(),
        chapter_start: chapter,
        verse_start: verses.first().map(|(v, _)| *v).unwrap_or(1),
        chapter_end: chapter,
        verse_end: verses.last().map(|(v, _)| *v).unwrap_or(1),
        testament: None,
        section: None,
        genre,
        verses: offsets,
    }
}

fn genesis_store() -> ChunkStore {
    ChunkStore::from_chunks([
        chunk_from_verses(
            "gen:1-2",
            "Genesis",
            1,
            &[
                (1, "In the beginning God created the heaven and the earth."),
                (2, "And the earth was without form, and void."),
            ],
            None,
        ),
        chunk_from_verses(
            "gen:2-3",
            "Genesis",
            1,
            &[
                (2, "And the earth was without form, and void."),
                (3, "And God said, Let there be light: and there was light."),
            ],
            None,
        ),
        chunk_from_verses("exo:13", "Exodus", 20, &[(13, "Thou shalt not kill.")], Some(QueryMode::Law)),
    ])
}

fn candidates(ids: &[&str]) -> Vec<Candidate> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| Candidate::new(*id, 1.0 - i as f32 * 0.1))
        .collect()
}

#[test]
fn blocks_preserve_rank_order() {
    let store = genesis_store();
    let cfg = RetrievalConfig::default();
    let blocks = format_context(&candidates(&["gen:2-3", "exo:13", "gen:1-2"]), &store, &cfg);
    let labels: Vec<&str> = blocks.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Genesis 1:2-3", "Exodus 20:13", "Genesis 1:1-2"]);
}

#[test]
fn verses_inside_a_block_are_in_corpus_order() {
    // Offsets recorded in reverse order; display must still follow the corpus.
    let mut chunk = chunk_from_verses(
        "gen:rev",
        "Genesis",
        1,
        &[
            (2, "And the earth was without form, and void."),
            (1, "In the beginning God created the heaven and the earth."),
        ],
        None,
    );
    chunk.verse_start = 1;
    chunk.verse_end = 2;
    let store = ChunkStore::from_chunks([chunk]);
    let cfg = RetrievalConfig::default();

    let blocks = format_context(&candidates(&["gen:rev"]), &store, &cfg);
    let verse_numbers: Vec<u32> = blocks[0].verses.iter().map(|(r, _)| r.verse).collect();
    assert_eq!(verse_numbers, vec![1, 2]);
}

#[test]
fn overlapping_chunks_duplicate_verses_by_default() {
    let store = genesis_store();
    let cfg = RetrievalConfig::default();
    assert!(!cfg.dedupe_blocks);

    let blocks = format_context(&candidates(&["gen:1-2", "gen:2-3"]), &store, &cfg);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].verses.len(), 2);
    assert_eq!(blocks[1].verses.len(), 2);

    let verse2 = VerseRef::new("Genesis", 1, 2);
    let occurrences = blocks
        .iter()
        .flat_map(|b| b.verses.iter())
        .filter(|(r, _)| *r == verse2)
        .count();
    assert_eq!(occurrences, 2, "Genesis 1:2 appears in both blocks");
}

#[test]
fn dedupe_suppresses_already_shown_verses() {
    let store = genesis_store();
    let cfg = RetrievalConfig { dedupe_blocks: true, ..Default::default() };

    let blocks = format_context(&candidates(&["gen:1-2", "gen:2-3", "gen:1-2"]), &store, &cfg);
    assert_eq!(blocks.len(), 2, "fully duplicated block is omitted");
    assert_eq!(blocks[0].verses.len(), 2);
    assert_eq!(blocks[1].verses.len(), 1, "only Genesis 1:3 is new");
    assert_eq!(blocks[1].verses[0].0, VerseRef::new("Genesis", 1, 3));
}

#[test]
fn missing_chunk_is_skipped_not_fatal() {
    let store = genesis_store();
    let cfg = RetrievalConfig::default();

    let ranked = candidates(&["gen:1-2", "ghost:1", "gen:2-3", "exo:13", "gen:1-2"]);
    let blocks = format_context(&ranked, &store, &cfg);
    assert_eq!(blocks.len(), 4, "five ranked, one bad reference, four blocks");
}

#[test]
fn empty_ranking_formats_to_empty_output() {
    let store = genesis_store();
    let cfg = RetrievalConfig::default();
    let blocks = format_context(&[], &store, &cfg);
    assert!(blocks.is_empty());
    assert_eq!(render(&blocks), "");
}

#[test]
fn block_cap_truncates_output() {
    let store = genesis_store();
    let cfg = RetrievalConfig { max_blocks: 2, ..Default::default() };
    let blocks = format_context(&candidates(&["gen:1-2", "gen:2-3", "exo:13"]), &store, &cfg);
    assert_eq!(blocks.len(), 2);
}

#[test]
fn chunk_without_offsets_falls_back_to_whole_text() {
    let mut chunk = chunk_from_verses("exo:nooff", "Exodus", 20, &[(13, "Thou shalt not kill.")], None);
    chunk.verses.clear();
    let store = ChunkStore::from_chunks([chunk]);
    let cfg = RetrievalConfig::default();

    let blocks = format_context(&candidates(&["exo:nooff"]), &store, &cfg);
    assert_eq!(blocks[0].verses.len(), 1);
    assert_eq!(blocks[0].verses[0].0, VerseRef::new("Exodus", 20, 13));
    assert_eq!(blocks[0].verses[0].1, "Thou shalt not kill.");
}

#[test]
fn formatting_is_deterministic() {
    let store = genesis_store();
    let cfg = RetrievalConfig::default();
    let ranked = candidates(&["gen:2-3", "gen:1-2", "exo:13"]);

    let first = format_context(&ranked, &store, &cfg);
    let second = format_context(&ranked, &store, &cfg);
    assert_eq!(first, second);
    assert_eq!(render(&first), render(&second));

    let a = serde_json::to_string(&first).expect("serialize");
    let b = serde_json::to_string(&second).expect("serialize");
    assert_eq!(a, b, "byte-identical serialized output");
}

#[test]
fn render_shapes_passage_blocks() {
    let store = genesis_store();
    let cfg = RetrievalConfig::default();
    let blocks = format_context(&candidates(&["exo:13"]), &store, &cfg);
    let text = render(&blocks);
    assert!(text.starts_with("[Passage 1]\nChunk reference: Exodus 20:13\n"));
    assert!(text.contains("Exodus 20:13 — \"Thou shalt not kill.\""));
}
