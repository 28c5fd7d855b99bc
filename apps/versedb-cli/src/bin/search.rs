use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use versedb_core::config::Config;
use versedb_core::store::ChunkStore;
use versedb_core::traits::{Embedder, VectorIndex};
use versedb_embed::default_embedder;
use versedb_retrieval::RetrievalPipeline;
use versedb_vector::{LanceIndex, MemoryIndex};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [--limit N]", args[0]);
        eprintln!("Example: {} 'Thou shalt not kill' --limit 10", args[0]);
        std::process::exit(1);
    }
    let query = &args[1];
    let mut limit = 10usize;
    let mut i = 2;
    while i < args.len() {
        if args[i] == "--limit" {
            let Some(n) = args.get(i + 1).and_then(|v| v.parse().ok()) else {
                eprintln!("Error: --limit requires a number");
                std::process::exit(1);
            };
            limit = n;
            i += 1;
        }
        i += 1;
    }

    let config = Config::load()?;
    let retrieval_cfg = config.retrieval()?;
    let store_cfg = config.store()?;
    let store = Arc::new(ChunkStore::load(&store_cfg.chunks_file, &store_cfg.verse_index_file)?);
    let embedder = default_embedder(&config.embedding()?)?;
    let index = open_index(&config, retrieval_cfg.search_timeout_ms, &store, embedder.as_ref())?;

    let pipeline = RetrievalPipeline::new(store.clone(), embedder, index, retrieval_cfg)?;

    let normalized = pipeline.normalize(query);
    let mode = pipeline.mode(&normalized);
    println!("Query: {}", query);
    println!("Normalized: {}", normalized.text);
    println!("Mode: {}", mode);

    let candidates = pipeline.candidates(query)?;
    println!("\nFound {} candidates", candidates.len());
    for (n, cand) in candidates.iter().take(limit).enumerate() {
        let reference = store
            .get(&cand.chunk_id)
            .map(|c| c.reference_label())
            .unwrap_or_else(|| "<unknown>".to_string());
        println!(
            "\n  {}. score={:.4}  sim={:.4}  id={}  ref={}",
            n + 1,
            cand.rerank_score,
            cand.similarity,
            cand.chunk_id,
            reference
        );
        for (signal, value) in &cand.signals {
            println!("     {} = {:.4}", signal, value);
        }
    }
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
