// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running
//! the all-MiniLM-L6-v2 sentence transformer model.
//!
//! Features:
//! - ONNX model loading from disk
//! - BERT tokenization with truncation to the max sequence length
//! - Single and batch embedding generation
//! - Mean pooling over token embeddings, then L2 normalization
//! - 384-dimensional output vectors

use crate::embeddings::pooling::{l2_normalize, mean_pool};
use crate::embeddings::EmbeddingBackend;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis, Ix2};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// Texts per ONNX run; bounds the `[batch, seq_len, hidden]` output tensor
pub const INFERENCE_CHUNK_SIZE: usize = 32;

/// ONNX-based embedding model (all-MiniLM-L6-v2)
///
/// The exported graph returns token-level states `[batch, seq_len, hidden]`;
/// sentence vectors are produced here by attention-masked mean pooling
/// followed by L2 normalization, matching sentence-transformers output.
///
/// # Thread Safety
/// All fields are wrapped in Arc for cheap cloning. The session sits behind
/// a Mutex because `Session::run` needs exclusive access.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime session
    session: Arc<Mutex<Session>>,

    /// BERT tokenizer (truncation configured, padding disabled)
    tokenizer: Arc<Tokenizer>,

    /// Model name (e.g., "sentence-transformers/all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension (384 for all-MiniLM-L6-v2)
    dimension: usize,

    /// Maximum sequence length in tokens
    max_length: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads the model and tokenizer from disk and validates the output shape
    ///
    /// Blocking: builds the ONNX session and runs one validation inference. Call
    /// from `spawn_blocking` when on an async runtime.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - Model output is not `[batch, seq_len, dimension]`
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::load(
    ///     "sentence-transformers/all-MiniLM-L6-v2",
    ///     "./models/all-MiniLM-L6-v2/model.onnx",
    ///     "./models/all-MiniLM-L6-v2/tokenizer.json",
    ///     384,
    ///     256,
    /// )?;
    /// ```
    pub fn load<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        dimension: usize,
        max_length: usize,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Initializing ONNX embedding model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure tokenizer truncation: {}", e))?;
        tokenizer.with_padding(None);

        let model = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
            max_length,
        };

        // Validation run: fails early if the graph does not emit `dimension` features
        model
            .embed_batch_blocking(&["validation test".to_string()])
            .context("Model validation inference failed")?;

        info!(
            "ONNX embedding model loaded: {} ({} dimensions, max {} tokens)",
            model.model_name, model.dimension, model.max_length
        );

        Ok(model)
    }

    /// Generates embeddings for any number of texts
    ///
    /// Blocking. Runs the model on chunks of [`INFERENCE_CHUNK_SIZE`] texts,
    /// each padded to its own longest text. Output order matches `texts`.
    pub fn embed_batch_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        embed_in_chunks(texts, INFERENCE_CHUNK_SIZE, |chunk| {
            self.embed_chunk_blocking(chunk)
        })
    }

    /// One padded ONNX run over `texts`
    fn embed_chunk_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings: Vec<_> = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids_batch = Vec::with_capacity(texts.len() * max_len);
        let mut attention_mask_batch = Vec::with_capacity(texts.len() * max_len);
        let mut token_type_ids_batch = Vec::with_capacity(texts.len() * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let padding_needed = max_len - ids.len();

            input_ids_batch.extend(ids.iter().map(|&id| id as i64));
            attention_mask_batch.extend(mask.iter().map(|&m| m as i64));
            token_type_ids_batch.extend(std::iter::repeat(0i64).take(ids.len()));

            input_ids_batch.extend(std::iter::repeat(0i64).take(padding_needed));
            attention_mask_batch.extend(std::iter::repeat(0i64).take(padding_needed));
            token_type_ids_batch.extend(std::iter::repeat(0i64).take(padding_needed));
        }

        let attention_mask_for_pooling = attention_mask_batch.clone();

        let input_ids_array = Array2::from_shape_vec((texts.len(), max_len), input_ids_batch)
            .context("Failed to create batch input_ids array")?;
        let attention_mask_array =
            Array2::from_shape_vec((texts.len(), max_len), attention_mask_batch)
                .context("Failed to create batch attention_mask array")?;
        let token_type_ids_array =
            Array2::from_shape_vec((texts.len(), max_len), token_type_ids_batch)
                .context("Failed to create batch token_type_ids array")?;

        let mut session_guard = self
            .session
            .lock()
            .map_err(|e| anyhow!("ONNX session lock poisoned: {}", e))?;
        let outputs = session_guard.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids_array)?,
            "attention_mask" => Value::from_array(attention_mask_array)?,
            "token_type_ids" => Value::from_array(token_type_ids_array)?
        ])?;

        // Index [0]: exported models disagree on the output name
        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let shape = output_array.shape();
        if shape.len() != 3 || shape[0] != texts.len() || shape[2] != self.dimension {
            anyhow::bail!(
                "Model outputs unexpected dimensions: {:?} (expected [{}, seq_len, {}])",
                shape,
                texts.len(),
                self.dimension
            );
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch_idx in 0..texts.len() {
            let token_states = output_array
                .index_axis(Axis(0), batch_idx)
                .into_dimensionality::<Ix2>()
                .context("Failed to view token states as [seq_len, hidden]")?;

            let mask_start = batch_idx * max_len;
            let item_mask = &attention_mask_for_pooling[mask_start..mask_start + max_len];

            let mut pooled = mean_pool(token_states, item_mask);
            l2_normalize(&mut pooled);
            embeddings.push(pooled);
        }

        debug!("Embedded batch of {} texts (padded to {} tokens)", texts.len(), max_len);

        Ok(embeddings)
    }
}

/// Applies `embed_chunk` to consecutive chunks and concatenates the results
pub fn embed_in_chunks<F>(
    texts: &[String],
    chunk_size: usize,
    mut embed_chunk: F,
) -> Result<Vec<Vec<f32>>>
where
    F: FnMut(&[String]) -> Result<Vec<Vec<f32>>>,
{
    let mut embeddings = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(chunk_size.max(1)) {
        let chunk_embeddings = embed_chunk(chunk)?;
        if chunk_embeddings.len() != chunk.len() {
            anyhow::bail!(
                "Chunk produced {} embeddings for {} texts",
                chunk_embeddings.len(),
                chunk.len()
            );
        }
        embeddings.extend(chunk_embeddings);
    }
    Ok(embeddings)
}

#[async_trait]
impl EmbeddingBackend for OnnxEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings.pop().context("Model returned no embedding")
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = self.clone();
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || model.embed_batch_blocking(&texts))
            .await
            .context("Embedding task panicked")?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn max_sequence_length(&self) -> usize {
        self.max_length
    }
}
