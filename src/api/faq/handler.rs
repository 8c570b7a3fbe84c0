// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /faq HTTP handler

use crate::api::faq::{FaqRequest, FaqResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use std::time::Instant;
use tracing::{info, warn};

/// POST /faq handler
///
/// # Request Body
/// ```json
/// { "query": "How can I donate money?", "top_k": 1 }
/// ```
///
/// # Errors
/// - 400 for a missing/non-string/empty query or a non-positive `top_k`
/// - 503 while the model cannot be loaded, 500 for inference failures
pub async fn faq_handler(
    State(state): State<AppState>,
    payload: Result<Json<FaqRequest>, JsonRejection>,
) -> Result<Json<FaqResponse>, ApiError> {
    let started = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected /faq body: {}", rejection.body_text());
        ApiError::InvalidRequest(rejection.body_text())
    })?;
    let (query, top_k) = request.validate()?;

    let matches = state
        .service
        .answer_query(&query, top_k)
        .await
        .map_err(|e| {
            warn!("FAQ query failed: {}", e);
            ApiError::from(e)
        })?;

    let processing_time_seconds = started.elapsed().as_secs_f64();
    info!(
        "FAQ query answered with {} matches in {:.3}s",
        matches.len(),
        processing_time_seconds
    );

    Ok(Json(FaqResponse {
        matches,
        query,
        processing_time_seconds,
    }))
}
