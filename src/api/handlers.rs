// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::embeddings::{ModelInfo, ProviderState};
use crate::version;
use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub model_state: ProviderState,
    pub model_loaded: bool,
    pub faq_index_ready: bool,
    pub faq_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiIndexResponse {
    pub name: String,
    pub version: String,
    pub build: String,
    pub features: Vec<String>,
    pub endpoints: Vec<EndpointInfo>,
}

/// GET /info - loads the model if needed, then describes it
pub async fn info_handler(State(state): State<AppState>) -> Result<Json<ModelInfo>, ApiError> {
    let info = state.service.model_info().await?;
    Ok(Json(info))
}

/// GET /health - never triggers a model load
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_state = state.service.provider().state();
    let index = state.service.index();

    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
        model_state,
        model_loaded: model_state == ProviderState::Ready,
        faq_index_ready: index.is_ready(),
        faq_entries: index.len(),
    })
}

/// GET /api - static endpoint listing
pub async fn api_index_handler() -> Json<ApiIndexResponse> {
    let endpoint = |path: &str, method: &str, description: &str| EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    };

    Json(ApiIndexResponse {
        name: version::SERVICE_NAME.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        build: version::VERSION.to_string(),
        features: version::FEATURES.iter().map(|f| f.to_string()).collect(),
        endpoints: vec![
            endpoint("/api/embed", "POST", "Generate embeddings for text"),
            endpoint("/api/faq", "POST", "Find best matching FAQ for a query"),
            endpoint("/api/info", "GET", "Get model information"),
            endpoint("/api/health", "GET", "Liveness and model load state"),
        ],
    })
}

pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}

pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
