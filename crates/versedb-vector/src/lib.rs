#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Vector index backends.
//!
//! `LanceIndex` opens the LanceDB table written by the indexing phase and
//! serves timeout-bounded nearest-neighbor queries. `MemoryIndex` is an
//! exact cosine index over in-process rows, used by tests, the eval tool
//! and corpora small enough to embed at startup. Both satisfy
//! `versedb_core::traits::VectorIndex`.

pub mod lance;
pub mod memory;
pub mod schema;

pub use lance::LanceIndex;
pub use memory::MemoryIndex;
