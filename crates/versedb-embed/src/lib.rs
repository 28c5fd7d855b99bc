#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Embedding capability.
//!
//! The production embedder runs BGE-M3 (XLM-RoBERTa weights) through candle
//! with masked mean pooling and L2 normalization, the same treatment the
//! chunk embeddings received at indexing time. `HashEmbedder` is a
//! deterministic stand-in with the same shape contract for tests and
//! environments without model files.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use versedb_core::config::EmbeddingConfig;
use versedb_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub const EMBEDDING_DIM: usize = 1024;
const MAX_LEN: usize = 256;

/// BGE-M3 sentence embedder.
pub struct BgeM3Embedder {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl BgeM3Embedder {
    pub fn new(model_dir: &Path) -> Result<Self> {
        let device = device::select_device();
        info!(model_dir = %model_dir.display(), "loading BGE-M3 model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;
        info!("BGE-M3 model loaded");
        Ok(Self { model, tokenizer, device })
    }
}

impl Embedder for BgeM3Embedder {
    fn dim(&self) -> usize {
        EMBEDDING_DIM
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize::tokenize_on_device(&self.tokenizer, text, MAX_LEN, &self.device)?;
        let token_type_ids = Tensor::zeros((1, MAX_LEN), DType::I64, &self.device)?;
        let hidden =
            self.model.forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;
        let pooled = pool::masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if emb.len() != EMBEDDING_DIM {
            return Err(anyhow!("unexpected embedding dim {}", emb.len()));
        }
        Ok(emb)
    }
}

/// Deterministic hashing embedder: tokens are hashed into a fixed number of
/// buckets and the vector is L2-normalized. Not semantically meaningful,
/// but stable across runs and processes, which is what tests need.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for (i, token) in text.to_lowercase().split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}

/// Build the configured embedder. The hashing fallback is selected by
/// `embedding.use_fake` or the `APP_USE_FAKE_EMBEDDINGS` environment
/// variable; otherwise the model directory is taken from configuration,
/// `APP_MODEL_DIR`, or the conventional `models/bge-m3` location.
pub fn default_embedder(cfg: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let env_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if cfg.use_fake || env_fake {
        debug!("using deterministic hashing embedder");
        return Ok(Arc::new(HashEmbedder::default()));
    }
    let model_dir = resolve_model_dir(cfg)?;
    Ok(Arc::new(BgeM3Embedder::new(&model_dir)?))
}

fn resolve_model_dir(cfg: &EmbeddingConfig) -> Result<PathBuf> {
    if let Some(dir) = &cfg.model_dir {
        if dir.exists() {
            return Ok(dir.clone());
        }
        return Err(anyhow!("configured model_dir {} does not exist", dir.display()));
    }
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            return Ok(p);
        }
    }
    let conventional = Path::new("models/bge-m3");
    if conventional.exists() {
        return Ok(conventional.to_path_buf());
    }
    Err(anyhow!("could not locate a BGE-M3 model directory"))
}
