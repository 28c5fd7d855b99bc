use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use versedb_core::config::Config;
use versedb_core::store::ChunkStore;
use versedb_core::traits::{Embedder, VectorIndex};
use versedb_embed::default_embedder;
use versedb_query::extract_reference;
use versedb_retrieval::{render, RetrievalPipeline};
use versedb_vector::{LanceIndex, MemoryIndex};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query>", args[0]);
        eprintln!("Example: {} 'What did Jesus teach about loving your enemies?'", args[0]);
        std::process::exit(1);
    }
    let query = &args[1];

    let config = Config::load()?;
    let retrieval_cfg = config.retrieval()?;
    let store_cfg = config.store()?;
    let store = Arc::new(ChunkStore::load(&store_cfg.chunks_file, &store_cfg.verse_index_file)?);
    let embedder = default_embedder(&config.embedding()?)?;
    let index = open_index(&config, retrieval_cfg.search_timeout_ms, &store, embedder.as_ref())?;

    let pipeline = RetrievalPipeline::new(store, embedder, index, retrieval_cfg)?;

    if let Some(r) = extract_reference(query) {
        match (r.chapter, r.verse_start) {
            (Some(c), Some(v)) => println!("Query cites {} {}:{}", r.book, c, v),
            (Some(c), None) => println!("Query cites {} {}", r.book, c),
            _ => println!("Query cites {}", r.book),
        }
    }

    let blocks = pipeline.context(query)?;
    if blocks.is_empty() {
        println!("No relevant Scripture passages found for this question.");
        return Ok(());
    }
    println!("{}", render(&blocks));
    Ok(())
}

/// Open the configured LanceDB index; without an `[index]` section the
/// snapshot is embedded into an in-memory index at startup instead.
fn open_index(
    config: &Config,
    timeout_ms: u64,
    store: &Arc<ChunkStore>,
    embedder: &dyn Embedder,
) -> anyhow::Result<Arc<dyn VectorIndex>> {
    match config.index() {
        Ok(index_cfg) => {
            let rt = tokio::runtime::Runtime::new()?;
            let index = rt.block_on(LanceIndex::open(
                &index_cfg.db_path,
                &index_cfg.table,
                Duration::from_millis(timeout_ms),
            ))?;
            Ok(Arc::new(index))
        }
        Err(_) => {
            info!("no vector index configured, embedding the snapshot in memory");
            Ok(Arc::new(MemoryIndex::from_store(store, embedder)?))
        }
    }
}
