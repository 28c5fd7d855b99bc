//! Configuration loader built on Figment.
//!
//! Merges `config.toml` + `config.<env>.toml` + `APP_*` environment
//! variables, the same layering the rest of the toolchain expects. Typed
//! sections are extracted eagerly and validated at load time so a bad weight
//! or a zero `top_k` is rejected before any query runs.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::QueryMode;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        // Eager validation: every section must extract and pass its checks now.
        config.retrieval()?;
        Ok(config)
    }

    /// Retrieval tuning; falls back to documented defaults when the section
    /// is absent.
    pub fn retrieval(&self) -> Result<RetrievalConfig> {
        let cfg: RetrievalConfig = self.extract_or_default("retrieval")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn store(&self) -> Result<StoreConfig> {
        self.extract("store")
    }

    pub fn embedding(&self) -> Result<EmbeddingConfig> {
        self.extract_or_default("embedding")
    }

    pub fn index(&self) -> Result<IndexConfig> {
        self.extract("index")
    }

    fn extract<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("section '{}': {}", key, e)))
    }

    fn extract_or_default<T: serde::de::DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        if self.figment.find_value(key).is_ok() { self.extract(key) } else { Ok(T::default()) }
    }
}

/// Tuning for retrieval, reranking and formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Candidates fetched from the vector index per query.
    pub top_k: usize,
    /// Weight of embedding similarity in the rerank score.
    pub w_sim: f32,
    /// Weight of lexical phrase overlap in the rerank score.
    pub w_overlap: f32,
    /// Weight of query-mode affinity in the rerank score.
    pub w_mode: f32,
    /// Affinity granted when chunk genre does not match the query mode.
    pub mode_partial_credit: f32,
    /// Candidates below this rerank score are dropped (each drop is logged).
    /// 0.0 keeps everything.
    pub min_rerank_score: f32,
    /// Merge verses already shown by an earlier block instead of repeating.
    pub dedupe_blocks: bool,
    /// Hard cap on formatted context blocks.
    pub max_blocks: usize,
    /// Phrase n-gram range used by the normalizer.
    pub ngram_min: usize,
    pub ngram_max: usize,
    /// Mode tie-break order, most specific first.
    pub mode_priority: Vec<QueryMode>,
    /// Embed the normalized query instead of the raw text.
    pub embed_normalized: bool,
    /// Time budget for one vector index call.
    pub search_timeout_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 25,
            w_sim: 0.6,
            w_overlap: 0.3,
            w_mode: 0.1,
            mode_partial_credit: 0.0,
            min_rerank_score: 0.0,
            dedupe_blocks: false,
            max_blocks: 15,
            ngram_min: 2,
            ngram_max: 4,
            mode_priority: vec![
                QueryMode::Law,
                QueryMode::Prophecy,
                QueryMode::Discourse,
                QueryMode::Wisdom,
                QueryMode::Lookup,
                QueryMode::Narrative,
            ],
            embed_normalized: false,
            search_timeout_ms: 5000,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be positive".into()));
        }
        for (name, w) in [("w_sim", self.w_sim), ("w_overlap", self.w_overlap), ("w_mode", self.w_mode)] {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::InvalidConfig(format!("{} must be finite and >= 0, got {}", name, w)));
            }
        }
        if self.w_sim + self.w_overlap + self.w_mode <= 0.0 {
            return Err(Error::InvalidConfig("rerank weights must not all be zero".into()));
        }
        for (name, v) in [
            ("mode_partial_credit", self.mode_partial_credit),
            ("min_rerank_score", self.min_rerank_score),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(Error::InvalidConfig(format!("{} must be within 0..=1, got {}", name, v)));
            }
        }
        if self.ngram_min == 0 || self.ngram_min > self.ngram_max {
            return Err(Error::InvalidConfig(format!(
                "phrase n-gram range must satisfy 0 < min <= max, got {}..={}",
                self.ngram_min, self.ngram_max
            )));
        }
        if self.max_blocks == 0 {
            return Err(Error::InvalidConfig("max_blocks must be positive".into()));
        }
        if self.search_timeout_ms == 0 {
            return Err(Error::InvalidConfig("search_timeout_ms must be positive".into()));
        }
        let mut seen = Vec::new();
        for mode in &self.mode_priority {
            if seen.contains(mode) {
                return Err(Error::InvalidConfig(format!("mode_priority lists {} twice", mode)));
            }
            seen.push(*mode);
        }
        Ok(())
    }
}

/// Location of the ingestion snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub chunks_file: PathBuf,
    pub verse_index_file: PathBuf,
}

/// Embedding model selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Directory holding the BGE-M3 tokenizer, config and weights.
    pub model_dir: Option<PathBuf>,
    /// Use the deterministic hashing embedder instead of the model.
    pub use_fake: bool,
}

/// Location of the persisted vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub db_path: PathBuf,
    pub table: String,
}
