// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    embed_handler, faq_handler,
    handlers::{
        api_index_handler, health_handler, info_handler, method_not_allowed_handler,
        not_found_handler,
    },
};
use crate::faq::QueryService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
}

impl AppState {
    pub fn new(service: Arc<QueryService>) -> Self {
        Self { service }
    }
}

/// Endpoints served both at the root and under `/api`
fn endpoint_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/embed",
            post(embed_handler).fallback(method_not_allowed_handler),
        )
        .route("/faq", post(faq_handler).fallback(method_not_allowed_handler))
        .route("/info", get(info_handler).fallback(method_not_allowed_handler))
        .route(
            "/health",
            get(health_handler).fallback(method_not_allowed_handler),
        )
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(endpoint_routes())
        .nest("/api", endpoint_routes())
        .route(
            "/api",
            get(api_index_handler).fallback(method_not_allowed_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        // Preflight requests are answered here, before any handler runs
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
