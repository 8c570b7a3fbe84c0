// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedResponse type for POST /embed

use serde::{Deserialize, Serialize};

/// Response body for POST /embed
///
/// # Example
/// ```json
/// {
///   "embeddings": [[0.1, 0.2, ...]],
///   "dimensions": 384,
///   "texts_processed": 1,
///   "processing_time_seconds": 0.012
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// One vector per input text, in input order
    pub embeddings: Vec<Vec<f32>>,

    /// Length of every vector in `embeddings`
    pub dimensions: usize,

    pub texts_processed: usize,

    pub processing_time_seconds: f64,
}

impl EmbedResponse {
    pub fn new(embeddings: Vec<Vec<f32>>, processing_time_seconds: f64) -> Self {
        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        Self {
            texts_processed: embeddings.len(),
            dimensions,
            embeddings,
            processing_time_seconds,
        }
    }
}
