// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model file resolution and loading
//!
//! Model files come either from explicit local paths or from the
//! HuggingFace Hub (cached under `~/.cache/huggingface/hub/`).

use crate::embeddings::{
    EmbeddingBackend, ModelLoader, OnnxEmbeddingModel, DEFAULT_DIMENSION,
    DEFAULT_MAX_SEQUENCE_LENGTH, DEFAULT_MODEL_ID,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// ONNX graph location inside the sentence-transformers repository
const HUB_MODEL_FILE: &str = "onnx/model.onnx";
const HUB_TOKENIZER_FILE: &str = "tokenizer.json";

/// Configuration for loading the ONNX embedding model
#[derive(Debug, Clone)]
pub struct OnnxModelConfig {
    /// HuggingFace repository id, also reported as the model name
    pub model_id: String,
    /// Local ONNX model file; downloaded from the hub when unset
    pub model_path: Option<PathBuf>,
    /// Local tokenizer JSON file; downloaded from the hub when unset
    pub tokenizer_path: Option<PathBuf>,
    /// Expected embedding dimensions
    pub dimensions: usize,
    /// Token limit per text
    pub max_sequence_length: usize,
}

impl Default for OnnxModelConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_path: None,
            tokenizer_path: None,
            dimensions: DEFAULT_DIMENSION,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

/// Resolved on-disk model files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

/// Resolves model files, downloading whatever is not configured locally
///
/// Uses `hf_hub::api::sync::Api`, so this performs blocking network I/O.
pub fn resolve_model_files(config: &OnnxModelConfig) -> Result<ModelFiles> {
    if let (Some(model_path), Some(tokenizer_path)) = (&config.model_path, &config.tokenizer_path)
    {
        return Ok(ModelFiles {
            model_path: model_path.clone(),
            tokenizer_path: tokenizer_path.clone(),
        });
    }

    info!("Fetching {} from HuggingFace Hub", config.model_id);
    let api = hf_hub::api::sync::Api::new().context("Failed to initialize HuggingFace Hub API")?;
    let repo = api.model(config.model_id.clone());

    let model_path = match &config.model_path {
        Some(path) => path.clone(),
        None => repo
            .get(HUB_MODEL_FILE)
            .with_context(|| format!("Failed to download {}", HUB_MODEL_FILE))?,
    };
    let tokenizer_path = match &config.tokenizer_path {
        Some(path) => path.clone(),
        None => repo
            .get(HUB_TOKENIZER_FILE)
            .with_context(|| format!("Failed to download {}", HUB_TOKENIZER_FILE))?,
    };

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
    })
}

/// Loads [`OnnxEmbeddingModel`] for an [`EmbeddingProvider`]
///
/// [`EmbeddingProvider`]: crate::embeddings::EmbeddingProvider
#[derive(Debug, Clone)]
pub struct OnnxModelLoader {
    config: OnnxModelConfig,
}

impl OnnxModelLoader {
    pub fn new(config: OnnxModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OnnxModelConfig {
        &self.config
    }
}

#[async_trait]
impl ModelLoader for OnnxModelLoader {
    async fn load(&self) -> Result<Arc<dyn EmbeddingBackend>> {
        let config = self.config.clone();

        let result = tokio::task::spawn_blocking(move || {
            let files = resolve_model_files(&config)?;
            OnnxEmbeddingModel::load(
                config.model_id.clone(),
                files.model_path,
                files.tokenizer_path,
                config.dimensions,
                config.max_sequence_length,
            )
        })
        .await
        .context("Model loading task panicked")?;

        match result {
            Ok(model) => Ok(Arc::new(model)),
            Err(e) => {
                error!("Failed to load model {}: {:#}", self.config.model_id, e);
                Err(e)
            }
        }
    }
}
