// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Lazily loaded, shared embedding provider
//!
//! The model is loaded on first use and reused for the rest of the process.
//! The load runs in a background task, so a caller that goes away mid-load
//! does not cancel it; concurrent first callers wait on the same attempt.
//! Inference is bounded by a semaphore since the ONNX session is not
//! reentrant.

use crate::embeddings::{DetachedOnce, EmbeddingBackend, EmbeddingError, ModelLoader};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Lifecycle of the underlying model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderState {
    Unloaded,
    Loading,
    Ready,
}

/// Static descriptor of the loaded model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub embedding_dimensions: usize,
    pub max_sequence_length: usize,
}

/// Owner of the embedding model handle
///
/// # Example
/// ```ignore
/// let provider = EmbeddingProvider::new(Arc::new(OnnxModelLoader::new(config)), 1);
/// let vector = provider.embed_one("How can I donate?").await?;
/// assert_eq!(vector.len(), 384);
/// ```
pub struct EmbeddingProvider {
    loader: Arc<dyn ModelLoader>,
    backend: DetachedOnce<Arc<dyn EmbeddingBackend>>,
    inference_permits: Semaphore,
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("state", &self.state())
            .field("inference_permits", &self.inference_permits.available_permits())
            .finish_non_exhaustive()
    }
}

impl EmbeddingProvider {
    /// Creates an unloaded provider
    ///
    /// `max_concurrent_inferences` is clamped to at least 1.
    pub fn new(loader: Arc<dyn ModelLoader>, max_concurrent_inferences: usize) -> Self {
        Self {
            loader,
            backend: DetachedOnce::new(),
            inference_permits: Semaphore::new(max_concurrent_inferences.max(1)),
        }
    }

    pub fn state(&self) -> ProviderState {
        if self.backend.get().is_some() {
            ProviderState::Ready
        } else if self.backend.is_initializing() {
            ProviderState::Loading
        } else {
            ProviderState::Unloaded
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ProviderState::Ready
    }

    /// Returns the backend, loading it on first call
    ///
    /// A failed load is reported to every caller waiting on it and leaves
    /// the provider `Unloaded`; the next caller retries.
    async fn backend(&self) -> Result<Arc<dyn EmbeddingBackend>, EmbeddingError> {
        self.backend
            .get_or_spawn(
                || {
                    let loader = self.loader.clone();
                    async move {
                        info!("Loading embedding model... This may take a moment.");
                        let started = Instant::now();

                        match loader.load().await {
                            Ok(backend) => {
                                info!(
                                    "Embedding model {} loaded in {:.2}s ({} dimensions)",
                                    backend.model_name(),
                                    started.elapsed().as_secs_f64(),
                                    backend.dimension()
                                );
                                Ok(backend)
                            }
                            Err(e) => {
                                warn!("Embedding model load failed: {:#}", e);
                                Err(EmbeddingError::ModelLoad(format!("{:#}", e)))
                            }
                        }
                    }
                },
                EmbeddingError::ModelLoad,
            )
            .await
    }

    /// Forces the model load without embedding anything
    pub async fn warm_up(&self) -> Result<(), EmbeddingError> {
        self.backend().await.map(|_| ())
    }

    /// Describes the model; loads it if necessary
    pub async fn model_info(&self) -> Result<ModelInfo, EmbeddingError> {
        let backend = self.backend().await?;
        Ok(ModelInfo {
            model_name: backend.model_name().to_string(),
            embedding_dimensions: backend.dimension(),
            max_sequence_length: backend.max_sequence_length(),
        })
    }

    /// Embeds a single text
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let backend = self.backend().await?;
        let _permit = self
            .inference_permits
            .acquire()
            .await
            .map_err(|_| EmbeddingError::Inference("inference queue closed".to_string()))?;

        let embedding = backend
            .embed(text)
            .await
            .map_err(|e| EmbeddingError::Inference(format!("{:#}", e)))?;

        check_dimension(backend.dimension(), &embedding)?;
        Ok(embedding)
    }

    /// Embeds many texts in one backend call
    ///
    /// Output order and length match `texts`. An empty input returns an
    /// empty result without touching the model.
    pub async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let backend = self.backend().await?;
        let _permit = self
            .inference_permits
            .acquire()
            .await
            .map_err(|_| EmbeddingError::Inference("inference queue closed".to_string()))?;

        let embeddings = backend
            .embed_batch(texts)
            .await
            .map_err(|e| EmbeddingError::Inference(format!("{:#}", e)))?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::Inference(format!(
                "backend returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }
        for embedding in &embeddings {
            check_dimension(backend.dimension(), embedding)?;
        }

        debug!("Embedded {} texts", texts.len());
        Ok(embeddings)
    }
}

fn check_dimension(expected: usize, embedding: &[f32]) -> Result<(), EmbeddingError> {
    if embedding.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(())
}
