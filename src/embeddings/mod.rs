// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embeddings
//!
//! The FAQ core consumes a single capability: text in, fixed-length `f32`
//! vector out. That capability sits behind [`EmbeddingBackend`]; the
//! production implementation is [`OnnxEmbeddingModel`] (all-MiniLM-L6-v2
//! through ONNX Runtime). [`EmbeddingProvider`] owns the lazily loaded
//! backend and is what the rest of the crate talks to.

pub mod detached_once;
pub mod hashing;
pub mod model_loader;
pub mod onnx_model;
pub mod pooling;
pub mod provider;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use detached_once::DetachedOnce;
pub use hashing::{HashingBackend, HashingLoader};
pub use model_loader::{resolve_model_files, ModelFiles, OnnxModelConfig, OnnxModelLoader};
pub use onnx_model::OnnxEmbeddingModel;
pub use provider::{EmbeddingProvider, ModelInfo, ProviderState};

/// Default HuggingFace repository for the embedding model
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Output dimension of all-MiniLM-L6-v2
pub const DEFAULT_DIMENSION: usize = 384;

/// Maximum number of tokens fed to the model per text
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

/// Errors surfaced by the embedding layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    /// The model could not be fetched or initialized
    #[error("Failed to load embedding model: {0}")]
    ModelLoad(String),

    /// Tokenization or inference failed for a given input
    #[error("Embedding inference failed: {0}")]
    Inference(String),

    /// The backend produced a vector of the wrong length
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// A loaded embedding model
///
/// Implementations must return vectors of exactly [`dimension`] values,
/// mean pooled over token states and L2 normalized, and `embed_batch` must
/// preserve input order.
///
/// [`dimension`]: EmbeddingBackend::dimension
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;

    fn max_sequence_length(&self) -> usize;
}

/// Produces a backend on demand
///
/// Called by [`EmbeddingProvider`] at most once per successful load; this is
/// where slow work (downloads, session creation) lives.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> anyhow::Result<Arc<dyn EmbeddingBackend>>;
}
