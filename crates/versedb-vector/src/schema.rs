//! Arrow schema of the embeddings table.
//!
//! The indexing phase owns writing this table; the schema lives here so the
//! search path and test fixtures agree on the column contract.

use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

/// Embeddings table: chunk id plus a fixed-size vector column.
pub fn build_index_schema(dim: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim as i32),
            true,
        ),
    ]))
}
