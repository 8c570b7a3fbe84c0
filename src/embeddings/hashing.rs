// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic bag-of-words embedding backend
//!
//! Hashes the first `max_sequence_length` lowercase alphanumeric tokens
//! into buckets and L2 normalizes the counts. No model files, no network:
//! used for offline runs (`--backend hashing`) and for exercising the FAQ
//! pipeline in tests. Scores only reflect shared words, not meaning.

use crate::embeddings::pooling::l2_normalize;
use crate::embeddings::{EmbeddingBackend, ModelLoader, DEFAULT_MAX_SEQUENCE_LENGTH};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HashingBackend {
    dimension: usize,
    max_sequence_length: usize,
}

impl HashingBackend {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(8),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }

    /// Tokens past this count are ignored
    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = max_sequence_length.max(1);
        self
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .take(self.max_sequence_length)
        {
            // FNV-1a
            let mut h: u64 = 1469598103934665603;
            for b in token.as_bytes() {
                h ^= *b as u64;
                h = h.wrapping_mul(1099511628211);
            }
            vector[(h as usize) % self.dimension] += 1.0;
        }

        l2_normalize(&mut vector);
        vector
    }
}

#[async_trait]
impl EmbeddingBackend for HashingBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hashing-bag-of-words"
    }

    fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }
}

/// [`ModelLoader`] that hands out a fresh [`HashingBackend`]
#[derive(Debug, Clone)]
pub struct HashingLoader {
    dimension: usize,
    max_sequence_length: usize,
}

impl HashingLoader {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }

    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = max_sequence_length;
        self
    }
}

#[async_trait]
impl ModelLoader for HashingLoader {
    async fn load(&self) -> Result<Arc<dyn EmbeddingBackend>> {
        Ok(Arc::new(
            HashingBackend::new(self.dimension)
                .with_max_sequence_length(self.max_sequence_length),
        ))
    }
}
