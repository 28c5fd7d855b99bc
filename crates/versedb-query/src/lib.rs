#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Query-side text processing: normalization, lemmatization, rhetorical
//! mode detection and Scripture reference extraction.
//!
//! Everything here is a total, side-effect-free function over the query
//! string; the lemmatizer and trigger tables are built once per process and
//! immutable afterwards.

pub mod lemma;
pub mod modes;
pub mod normalize;
pub mod refs;
pub mod stopwords;

pub use modes::{classify, TriggerTable};
pub use normalize::{NormalizedQuery, Normalizer};
pub use refs::{extract_reference, ScriptureRef};
