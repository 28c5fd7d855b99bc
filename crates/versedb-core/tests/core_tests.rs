use std::fs;

use tempfile::TempDir;

use versedb_core::books::{book_index, canonical_name};
use versedb_core::config::RetrievalConfig;
use versedb_core::store::ChunkStore;
use versedb_core::types::{Chunk, QueryMode, VerseRef};

fn chunk(id: &str, book: &str, text: &str) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        book: book.to_string(),
        chapter_start: 1,
        verse_start: 1,
        chapter_end: 1,
        verse_end: 2,
        testament: None,
        section: None,
        genre: None,
        verses: vec![],
    }
}

#[test]
fn verse_refs_order_by_canon_then_chapter_then_verse() {
    let genesis = VerseRef::new("Genesis", 50, 26);
    let exodus = VerseRef::new("Exodus", 1, 1);
    let matthew = VerseRef::new("Matthew", 5, 21);
    let revelation = VerseRef::new("Revelation", 22, 21);

    let mut refs = vec![revelation.clone(), matthew.clone(), genesis.clone(), exodus.clone()];
    refs.sort();
    assert_eq!(refs, vec![genesis, exodus, matthew, revelation]);
}

#[test]
fn unknown_books_sort_after_the_canon() {
    let canon = VerseRef::new("Revelation", 22, 21);
    let stray = VerseRef::new("Maccabees", 1, 1);
    assert!(canon < stray);
}

#[test]
fn book_index_accepts_variants() {
    assert_eq!(book_index("psalms"), book_index("Psalm"));
    assert_eq!(canonical_name("Revelations"), Some("Revelation"));
    assert_eq!(canonical_name("Laodiceans"), None);
}

#[test]
fn store_loads_snapshot_and_attaches_verse_offsets() {
    let tmp = TempDir::new().expect("tempdir");
    let chunks_file = tmp.path().join("chunks.json");
    let index_file = tmp.path().join("verse_index.json");

    let c = chunk("kjv:0", "Genesis", "In the beginning God created the heaven and the earth.");
    fs::write(&chunks_file, serde_json::to_string(&vec![c]).expect("serialize")).expect("write");
    fs::write(
        &index_file,
        r#"{"kjv:0":[{"chapter":1,"verse":1,"start":0,"end":54}]}"#,
    )
    .expect("write");

    let store = ChunkStore::load(&chunks_file, &index_file).expect("load");
    assert_eq!(store.len(), 1);
    let loaded = store.get("kjv:0").expect("chunk present");
    assert_eq!(loaded.verses.len(), 1);
    assert_eq!(&loaded.text[loaded.verses[0].start..loaded.verses[0].end], loaded.text.as_str());
}

#[test]
fn store_drops_out_of_bounds_offsets_but_keeps_the_chunk() {
    let tmp = TempDir::new().expect("tempdir");
    let chunks_file = tmp.path().join("chunks.json");
    let index_file = tmp.path().join("verse_index.json");

    let c = chunk("kjv:1", "Exodus", "Thou shalt not kill.");
    fs::write(&chunks_file, serde_json::to_string(&vec![c]).expect("serialize")).expect("write");
    fs::write(
        &index_file,
        r#"{"kjv:1":[{"chapter":20,"verse":13,"start":0,"end":9999}],"kjv:missing":[]}"#,
    )
    .expect("write");

    let store = ChunkStore::load(&chunks_file, &index_file).expect("load");
    let loaded = store.get("kjv:1").expect("chunk present");
    assert!(loaded.verses.is_empty(), "invalid offsets are dropped");
}

#[test]
fn verse_spans_cover_every_chunk() {
    let mut a = chunk("kjv:a", "Genesis", "In the beginning God created the heaven and the earth.");
    a.verses = vec![versedb_core::types::VerseOffsets { chapter: 1, verse: 1, start: 0, end: 54 }];
    let b = chunk("kjv:b", "Exodus", "Thou shalt not kill.");
    let store = ChunkStore::from_chunks([a, b]);

    let spans: std::collections::HashMap<&str, usize> =
        store.verse_spans().map(|(id, verses)| (id, verses.len())).collect();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans["kjv:a"], 1);
    assert_eq!(spans["kjv:b"], 0, "chunk without offsets still reports its span entry");
}

#[test]
fn store_rejects_malformed_snapshot_files() {
    let tmp = TempDir::new().expect("tempdir");
    let chunks_file = tmp.path().join("chunks.json");
    let index_file = tmp.path().join("verse_index.json");
    fs::write(&chunks_file, "not json").expect("write");
    fs::write(&index_file, "{}").expect("write");

    assert!(ChunkStore::load(&chunks_file, &index_file).is_err());
}

#[test]
fn default_retrieval_config_is_valid() {
    RetrievalConfig::default().validate().expect("defaults validate");
}

#[test]
fn config_validation_rejects_bad_values() {
    let mut cfg = RetrievalConfig { top_k: 0, ..Default::default() };
    assert!(cfg.validate().is_err(), "zero top_k");

    cfg = RetrievalConfig { w_sim: -0.1, ..Default::default() };
    assert!(cfg.validate().is_err(), "negative weight");

    cfg = RetrievalConfig { w_sim: 0.0, w_overlap: 0.0, w_mode: 0.0, ..Default::default() };
    assert!(cfg.validate().is_err(), "all-zero weights");

    cfg = RetrievalConfig { ngram_min: 3, ngram_max: 2, ..Default::default() };
    assert!(cfg.validate().is_err(), "inverted ngram range");

    cfg = RetrievalConfig { min_rerank_score: 1.5, ..Default::default() };
    assert!(cfg.validate().is_err(), "rerank floor above 1");

    cfg = RetrievalConfig {
        mode_priority: vec![QueryMode::Law, QueryMode::Law],
        ..Default::default()
    };
    assert!(cfg.validate().is_err(), "duplicate mode priority");
}

#[test]
fn chunk_reference_label_matches_span_shape() {
    let mut c = chunk("kjv:2", "Genesis", "text");
    c.chapter_start = 1;
    c.verse_start = 30;
    c.chapter_end = 2;
    c.verse_end = 3;
    assert_eq!(c.reference_label(), "Genesis 1:30-2:3");

    c.chapter_end = 1;
    c.verse_end = 31;
    assert_eq!(c.reference_label(), "Genesis 1:30-31");
}
