// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed HTTP handler

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use std::time::Instant;
use tracing::{info, warn};

/// POST /embed handler
///
/// Raw embedding API, independent of FAQ matching.
///
/// # Request Body
/// ```json
/// { "texts": ["text1", "text2"] }
/// ```
///
/// # Response Body
/// ```json
/// {
///   "embeddings": [[0.1, ...], [0.2, ...]],
///   "dimensions": 384,
///   "texts_processed": 2,
///   "processing_time_seconds": 0.03
/// }
/// ```
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let started = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected /embed body: {}", rejection.body_text());
        ApiError::InvalidRequest(rejection.body_text())
    })?;
    let texts = request.into_texts()?;

    let embeddings = state.service.batch_embed(&texts).await.map_err(|e| {
        warn!("Embedding {} texts failed: {}", texts.len(), e);
        ApiError::from(e)
    })?;

    let response = EmbedResponse::new(embeddings, started.elapsed().as_secs_f64());
    info!(
        "Embedded {} texts in {:.3}s",
        response.texts_processed, response.processing_time_seconds
    );

    Ok(Json(response))
}
