//! Sentence embeddings using candle + sentence-transformers.

use crate::error::{Result, ValidatorError};
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use hf_hub::{Repo, RepoType, api::sync::Api};
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

/// Longest input (in tokens) fed to the model; longer text is truncated.
const MAX_SEQUENCE_LENGTH: usize = 256;

/// Anything that can turn text into fixed-length vectors.
pub trait Embedder {
    /// Human-readable model name for logs.
    fn name(&self) -> &str;

    /// Generate embeddings for a batch of texts, in input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| ValidatorError::Embedding("model returned no embedding".to_string()))
    }
}

/// Paths of the three files a BERT sentence-transformer needs.
struct ModelFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

/// BERT sentence-embedding model (mean pooled, L2 normalised).
pub struct EmbeddingModel {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    normalize: bool,
    name: String,
}

impl EmbeddingModel {
    /// Load from a local directory when it exists, otherwise from the hub.
    pub fn load(model_path: &Path, model_id: &str) -> Result<Self> {
        if model_path.is_dir() {
            Self::from_dir(model_path)
        } else {
            tracing::warn!(
                "Model directory '{}' not found, fetching '{}' from Hugging Face Hub",
                model_path.display(),
                model_id
            );
            Self::from_hub(model_id)
        }
    }

    /// Load a sentence-transformers model saved in a local directory.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let weights = ["model.safetensors", "pytorch_model.bin"]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                ValidatorError::ModelLoad(format!("no model weights found in '{}'", dir.display()))
            })?;

        let files = ModelFiles {
            config: dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
            weights,
        };

        Self::from_files(&files, dir.display().to_string())
    }

    /// Load a sentence-transformers model by name from Hugging Face Hub.
    pub fn from_hub(model_id: &str) -> Result<Self> {
        let api = Api::new()
            .map_err(|e| ValidatorError::ModelLoad(format!("failed to create HF Hub API: {}", e)))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let fetch = |name: &str| {
            repo.get(name).map_err(|e| {
                ValidatorError::ModelLoad(format!("failed to get {} for '{}': {}", name, model_id, e))
            })
        };

        let files = ModelFiles {
            config: fetch("config.json")?,
            tokenizer: fetch("tokenizer.json")?,
            weights: fetch("model.safetensors").or_else(|_| fetch("pytorch_model.bin"))?,
        };

        Self::from_files(&files, model_id.to_string())
    }

    fn from_files(files: &ModelFiles, name: String) -> Result<Self> {
        let device = Device::Cpu;

        let config_text = std::fs::read_to_string(&files.config).map_err(|e| {
            ValidatorError::ModelLoad(format!("failed to read '{}': {}", files.config.display(), e))
        })?;
        let config: BertConfig = serde_json::from_str(&config_text)
            .map_err(|e| ValidatorError::ModelLoad(format!("failed to parse model config: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| ValidatorError::ModelLoad(format!("failed to load tokenizer: {}", e)))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| ValidatorError::ModelLoad(format!("failed to configure tokenizer: {}", e)))?;

        let is_safetensors = files.weights.extension().and_then(|e| e.to_str()) == Some("safetensors");
        let vb = if is_safetensors {
            // SAFETY: the weights file is not modified while it is mapped.
            unsafe { VarBuilder::from_mmaped_safetensors(&[&files.weights], DTYPE, &device) }
        } else {
            VarBuilder::from_pth(&files.weights, DTYPE, &device)
        }
        .map_err(|e| ValidatorError::ModelLoad(format!("failed to load model weights: {}", e)))?;

        let model = BertModel::load(vb, &config)
            .map_err(|e| ValidatorError::ModelLoad(format!("failed to build BERT model: {}", e)))?;

        Ok(Self {
            model,
            tokenizer,
            device,
            normalize: true,
            name,
        })
    }
}

impl Embedder for EmbeddingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| ValidatorError::Embedding(format!("tokenization failed: {}", e)))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids_vec = Vec::with_capacity(texts.len() * max_len);
        let mut attention_mask_vec = Vec::with_capacity(texts.len() * max_len);

        for encoding in &encodings {
            let mut padded_ids = encoding.get_ids().to_vec();
            let mut padded_mask = encoding.get_attention_mask().to_vec();
            padded_ids.resize(max_len, 0);
            padded_mask.resize(max_len, 0);

            input_ids_vec.extend(padded_ids);
            attention_mask_vec.extend(padded_mask);
        }

        let shape = (texts.len(), max_len);
        let input_ids = Tensor::from_vec(input_ids_vec, shape, &self.device)?;
        let attention_mask = Tensor::from_vec(attention_mask_vec, shape, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling over the sequence, ignoring padding
        let mask = attention_mask
            .unsqueeze(2)?
            .to_dtype(output.dtype())?
            .broadcast_as(output.shape())?;
        let summed = (output * &mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
        let pooled = (summed / counts)?;

        let embeddings = if self.normalize {
            let norms = pooled.sqr()?.sum_keepdim(1)?.sqrt()?;
            pooled.broadcast_div(&norms)?
        } else {
            pooled
        };

        Ok(embeddings.to_vec2::<f32>()?)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 for vectors of different length or zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold((0.0f64, 0.0f64, 0.0f64), |(d, na, nb), (&x, &y)| {
        let (x, y) = (f64::from(x), f64::from(y));
        (d + x * y, na + x * x, nb + y * y)
    });

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}
