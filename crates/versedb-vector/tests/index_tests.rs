use std::sync::Arc;
use std::time::Duration;

use arrow_array::{FixedSizeListArray, RecordBatch, RecordBatchIterator, StringArray};

use versedb_core::traits::VectorIndex;
use versedb_vector::schema::build_index_schema;
use versedb_vector::{LanceIndex, MemoryIndex};

const DIM: usize = 4;

fn unit(v: [f32; DIM]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
    v.iter().map(|x| x / norm).collect()
}

#[test]
fn memory_index_orders_by_similarity_with_id_tie_break() {
    let mut index = MemoryIndex::new();
    index.insert("b", unit([1.0, 0.0, 0.0, 0.0]));
    index.insert("a", unit([1.0, 0.0, 0.0, 0.0]));
    index.insert("c", unit([0.0, 1.0, 0.0, 0.0]));

    let hits = index.search(&unit([1.0, 0.0, 0.0, 0.0]), 3).expect("search");
    let ids: Vec<&str> = hits.iter().map(|h| h.chunk_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"], "equal scores break ties by id");
    assert!(hits[0].similarity >= hits[1].similarity);
    assert!(hits[1].similarity > hits[2].similarity);
}

#[test]
fn memory_index_empty_returns_empty() {
    let index = MemoryIndex::new();
    assert_eq!(index.len().expect("len"), 0);
    let hits = index.search(&unit([1.0, 0.0, 0.0, 0.0]), 5).expect("search");
    assert!(hits.is_empty());
}

#[test]
fn memory_index_truncates_to_k() {
    let mut index = MemoryIndex::new();
    for i in 0..10 {
        index.insert(format!("chunk:{i}"), unit([1.0, i as f32 * 0.1, 0.0, 0.0]));
    }
    let hits = index.search(&unit([1.0, 0.0, 0.0, 0.0]), 3).expect("search");
    assert_eq!(hits.len(), 3);
}

#[test]
fn memory_index_rejects_dimension_mismatch() {
    let mut index = MemoryIndex::new();
    index.insert("a", vec![1.0, 0.0]);
    assert!(index.search(&unit([1.0, 0.0, 0.0, 0.0]), 1).is_err());
}

async fn seed_lance_table(db_path: &std::path::Path, rows: &[(&str, [f32; DIM])]) {
    let conn = lancedb::connect(db_path.to_string_lossy().as_ref())
        .execute()
        .await
        .expect("connect");
    let schema = build_index_schema(DIM);
    let ids: Vec<&str> = rows.iter().map(|(id, _)| *id).collect();
    let vectors: Vec<Option<Vec<Option<f32>>>> = rows
        .iter()
        .map(|(_, v)| Some(unit(*v).into_iter().map(Some).collect()))
        .collect();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                vectors.into_iter(),
                DIM as i32,
            )),
        ],
    )
    .expect("record batch");
    let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
    conn.create_table("embeddings", reader).execute().await.expect("create table");
}

#[tokio::test]
async fn lance_index_returns_nearest_neighbors() {
    let tmp = tempfile::tempdir().expect("tempdir");
    seed_lance_table(
        tmp.path(),
        &[
            ("gen:1", [1.0, 0.0, 0.0, 0.0]),
            ("exo:1", [0.0, 1.0, 0.0, 0.0]),
            ("mat:1", [0.9, 0.1, 0.0, 0.0]),
        ],
    )
    .await;

    let index = LanceIndex::open(tmp.path(), "embeddings", Duration::from_secs(5))
        .await
        .expect("open");
    let hits = index.search_async(&unit([1.0, 0.0, 0.0, 0.0]), 2).await.expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk_id, "gen:1");
    assert_eq!(hits[1].chunk_id, "mat:1");
    assert!(hits[0].similarity >= hits[1].similarity);
}

#[tokio::test]
async fn lance_index_missing_table_is_the_empty_index() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let index = LanceIndex::open(tmp.path(), "embeddings", Duration::from_secs(5))
        .await
        .expect("open");
    assert_eq!(index.count_async().await.expect("count"), 0);
    let hits = index.search_async(&unit([1.0, 0.0, 0.0, 0.0]), 5).await.expect("search");
    assert!(hits.is_empty());
}
