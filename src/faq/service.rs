// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end query orchestration
//!
//! Validates input before any model work, then embeds and ranks. Failures
//! are returned as-is; there is no retry.

use crate::embeddings::{EmbeddingProvider, ModelInfo};
use crate::faq::errors::QueryError;
use crate::faq::index::{FaqIndex, ScoredMatch};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct QueryService {
    provider: Arc<EmbeddingProvider>,
    index: Arc<FaqIndex>,
}

impl QueryService {
    pub fn new(provider: Arc<EmbeddingProvider>, index: Arc<FaqIndex>) -> Self {
        Self { provider, index }
    }

    pub fn provider(&self) -> &Arc<EmbeddingProvider> {
        &self.provider
    }

    pub fn index(&self) -> &Arc<FaqIndex> {
        &self.index
    }

    /// Top-`top_k` FAQ matches for `query`
    ///
    /// # Errors
    /// - `InvalidInput` if `query` is empty or whitespace-only
    /// - `Embedding` if the model cannot be loaded or run
    pub async fn answer_query(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>, QueryError> {
        if query.trim().is_empty() {
            return Err(QueryError::invalid("query", "query must not be empty"));
        }
        let top_k = top_k.max(1);

        let query_vector = self.provider.embed_one(query).await?;
        let matches = self.index.rank(&query_vector, top_k).await?;

        debug!(
            "FAQ query matched {} entries (best score {:?})",
            matches.len(),
            matches.first().map(|m| m.score)
        );
        Ok(matches)
    }

    /// Raw embeddings for `texts`, in input order
    ///
    /// # Errors
    /// - `InvalidInput` if `texts` is empty
    /// - `Embedding` if the model cannot be loaded or run
    pub async fn batch_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, QueryError> {
        if texts.is_empty() {
            return Err(QueryError::invalid("texts", "Please provide texts to embed"));
        }

        Ok(self.provider.embed_many(texts).await?)
    }

    pub async fn model_info(&self) -> Result<ModelInfo, QueryError> {
        Ok(self.provider.model_info().await?)
    }

    /// Loads the model and precomputes FAQ embeddings
    pub async fn warm_up(&self) -> Result<(), QueryError> {
        self.provider.warm_up().await?;
        self.index.warm_up().await?;
        Ok(())
    }
}
