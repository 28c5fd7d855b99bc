//! Retrieval smoke evaluation against a fixed query set.
//!
//! Each query lists the books an answer is expected to come from; a query
//! counts as a hit when any of the top ranked chunks lands in one of them.
//! This is a coarse sanity gauge for tuning weights, not a benchmark.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use versedb_core::config::Config;
use versedb_core::store::ChunkStore;
use versedb_embed::default_embedder;
use versedb_retrieval::RetrievalPipeline;
use versedb_vector::MemoryIndex;

const EVAL_SET: &[(&str, &[&str])] = &[
    // Law / commandments
    ("Where does 'Thou shalt not steal' appear in the Bible?", &["Exodus", "Deuteronomy"]),
    ("Where does the Bible say 'Thou shalt not commit adultery'?", &["Exodus", "Deuteronomy"]),
    // Creation / narrative
    ("In the beginning God created the heaven and the earth", &["Genesis"]),
    ("What happened when God flooded the earth?", &["Genesis"]),
    // Discourse
    ("What did Jesus teach about loving your enemies?", &["Matthew"]),
    ("Where does Jesus tell about building on the rock versus the sand?", &["Matthew"]),
    ("Blessed are the pure in heart", &["Matthew"]),
    ("The stone the builders rejected", &["Psalms", "Matthew"]),
    // Epistles
    ("What does the Bible say about repentance and godly sorrow?", &["2 Corinthians"]),
    // Prophecy
    ("The days will come when I will bring judgment upon the nations", &["Joel", "Amos", "Ezekiel"]),
    // Wisdom
    ("What is the meaning of wisdom?", &["Proverbs", "Ecclesiastes", "James"]),
];

const HIT_DEPTH: usize = 5;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load()?;
    let retrieval_cfg = config.retrieval()?;
    let store_cfg = config.store()?;
    let store = Arc::new(ChunkStore::load(&store_cfg.chunks_file, &store_cfg.verse_index_file)?);
    let embedder = default_embedder(&config.embedding()?)?;
    // Exact in-memory index: eval results must not depend on ANN recall.
    let index = Arc::new(MemoryIndex::from_store(&store, embedder.as_ref())?);

    let pipeline = RetrievalPipeline::new(store.clone(), embedder, index, retrieval_cfg)?;

    let mut hits = 0usize;
    for (query, expected_books) in EVAL_SET {
        let candidates = pipeline.candidates(query)?;
        let found = candidates.iter().take(HIT_DEPTH).any(|cand| {
            store
                .get(&cand.chunk_id)
                .is_some_and(|chunk| expected_books.iter().any(|b| chunk.book == *b))
        });
        if found {
            hits += 1;
        }
        let top = candidates
            .first()
            .and_then(|c| store.get(&c.chunk_id))
            .map(|c| c.reference_label())
            .unwrap_or_else(|| "<none>".to_string());
        println!("[{}] {} -> {}", if found { "hit " } else { "miss" }, query, top);
    }
    println!(
        "\n{}/{} queries grounded in an expected book (depth {})",
        hits,
        EVAL_SET.len(),
        HIT_DEPTH
    );
    Ok(())
}
