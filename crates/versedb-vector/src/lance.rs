//! LanceDB-backed vector index.
//!
//! Opens an existing embeddings table and serves nearest-neighbor queries.
//! A missing or empty table is the cold-store condition and yields empty
//! results; transport failures and exceeded time budgets surface as
//! `Error::Upstream` / `Error::Timeout` so callers can tell them apart.
//! LanceDB may answer from an approximate index; result stability across
//! index rebuilds is a property of that index, not of this wrapper.

use std::path::Path;
use std::time::Duration;

use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use tracing::debug;

use versedb_core::error::{Error, Result};
use versedb_core::traits::VectorIndex;
use versedb_core::types::ScoredChunk;

pub struct LanceIndex {
    db: Connection,
    table_name: String,
    timeout: Duration,
}

impl LanceIndex {
    pub async fn open(db_path: &Path, table_name: &str, timeout: Duration) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref())
            .execute()
            .await
            .map_err(|e| Error::Upstream(format!("lancedb connect: {}", e)))?;
        Ok(Self { db, table_name: table_name.to_string(), timeout })
    }

    pub async fn search_async(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if !self.table_exists().await? {
            debug!(table = %self.table_name, "table absent, treating as empty index");
            return Ok(Vec::new());
        }
        let table = self
            .db
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| Error::Upstream(format!("open table {}: {}", self.table_name, e)))?;
        let mut stream = table
            .vector_search(query_vec.to_vec())
            .map_err(|e| Error::Upstream(format!("vector search: {}", e)))?
            .limit(k)
            .execute()
            .await
            .map_err(|e| Error::Upstream(format!("vector search: {}", e)))?;

        let mut hits = Vec::new();
        while let Some(batch) = TryStreamExt::try_next(&mut stream)
            .await
            .map_err(|e| Error::Upstream(format!("result stream: {}", e)))?
        {
            let ids = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<arrow_array::StringArray>())
                .ok_or_else(|| Error::Upstream("id column missing".into()))?;
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<arrow_array::Float32Array>());
            for i in 0..batch.num_rows() {
                let similarity = match distances {
                    Some(col) => 1.0 - col.value(i),
                    None => 0.5,
                };
                hits.push(ScoredChunk { chunk_id: ids.value(i).to_string(), similarity });
            }
        }
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    pub async fn count_async(&self) -> Result<usize> {
        if !self.table_exists().await? {
            return Ok(0);
        }
        let table = self
            .db
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| Error::Upstream(format!("open table {}: {}", self.table_name, e)))?;
        table
            .count_rows(None)
            .await
            .map_err(|e| Error::Upstream(format!("count rows: {}", e)))
    }

    async fn table_exists(&self) -> Result<bool> {
        let names = self
            .db
            .table_names()
            .execute()
            .await
            .map_err(|e| Error::Upstream(format!("table names: {}", e)))?;
        Ok(names.contains(&self.table_name))
    }

    fn block_on<F: std::future::Future>(&self, fut: F) -> Result<F::Output> {
        // The trait surface is synchronous; bridge onto a private runtime
        // like the rest of the toolchain does. Must not be called from
        // inside an async context.
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| Error::Upstream(format!("tokio runtime: {}", e)))?;
        Ok(rt.block_on(fut))
    }
}

impl VectorIndex for LanceIndex {
    fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let budget = self.timeout;
        // The timeout future must be created inside the runtime.
        let outcome = self.block_on(async {
            tokio::time::timeout(budget, self.search_async(query_vec, k)).await
        })?;
        outcome.map_err(|_| Error::Timeout(format!("vector search exceeded {:?}", budget)))?
    }

    fn len(&self) -> Result<usize> {
        let budget = self.timeout;
        let outcome =
            self.block_on(async { tokio::time::timeout(budget, self.count_async()).await })?;
        outcome.map_err(|_| Error::Timeout(format!("row count exceeded {:?}", budget)))?
    }
}
