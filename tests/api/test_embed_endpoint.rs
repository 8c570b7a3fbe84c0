// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed endpoint tests
//!
//! These tests verify that the embed endpoint:
//! - Returns one vector per text with matching counts
//! - Accepts a bare string as a single text
//! - Rejects missing, empty and malformed bodies with 400
//! - Reports model load failures as 503

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use faq_embed_node::{
    api::{create_router, AppState},
    embeddings::{EmbeddingBackend, EmbeddingProvider, HashingLoader, ModelLoader},
    faq::{builtin_corpus, FaqIndex, QueryService},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

const DIM: usize = 64;

/// Helper: router over the hashing backend
fn setup_app() -> Router {
    setup_app_with(Arc::new(HashingLoader::new(DIM)))
}

fn setup_app_with(loader: Arc<dyn ModelLoader>) -> Router {
    let provider = Arc::new(EmbeddingProvider::new(loader, 1));
    let index = Arc::new(FaqIndex::new(builtin_corpus(), provider.clone()));
    create_router(AppState::new(Arc::new(QueryService::new(provider, index))))
}

/// Helper: POST a raw body and decode the JSON reply
async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, &body.to_string()).await
}

struct OfflineLoader;

#[async_trait]
impl ModelLoader for OfflineLoader {
    async fn load(&self) -> anyhow::Result<Arc<dyn EmbeddingBackend>> {
        anyhow::bail!("failed to download onnx/model.onnx")
    }
}

#[cfg(test)]
mod embed_endpoint_tests {
    use super::*;

    // ========== SUCCESS CASES ==========

    #[tokio::test]
    async fn test_single_text() {
        let (status, body) = post_json(setup_app(), "/embed", json!({"texts": ["hello"]})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["texts_processed"], 1);
        assert_eq!(body["dimensions"], DIM);
        let embeddings = body["embeddings"].as_array().unwrap();
        assert_eq!(embeddings.len(), 1);
        assert_eq!(embeddings[0].as_array().unwrap().len(), DIM);
        assert!(body["processing_time_seconds"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_count() {
        let (status, body) = post_json(
            setup_app(),
            "/api/embed",
            json!({"texts": ["one", "two", "three"]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["texts_processed"], 3);
        assert_eq!(body["embeddings"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_bare_string_is_one_text() {
        let (status, body) = post_json(setup_app(), "/embed", json!({"texts": "hello"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["texts_processed"], 1);
    }

    // ========== VALIDATION ERRORS ==========

    #[tokio::test]
    async fn test_missing_texts() {
        let (status, body) = post_json(setup_app(), "/embed", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide texts to embed");
        assert_eq!(body["error_type"], "validation_error");
    }

    #[tokio::test]
    async fn test_empty_texts() {
        let (status, body) = post_json(setup_app(), "/embed", json!({"texts": []})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide texts to embed");
    }

    #[tokio::test]
    async fn test_empty_string_texts() {
        let (status, body) = post_json(setup_app(), "/embed", json!({"texts": ""})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide texts to embed");
    }

    #[tokio::test]
    async fn test_non_string_item() {
        let (status, body) =
            post_json(setup_app(), "/embed", json!({"texts": ["ok", 42]})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "texts[1]");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (status, body) = post_raw(setup_app(), "/embed", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_type"], "invalid_request");
    }

    // ========== MODEL FAILURES ==========

    #[tokio::test]
    async fn test_model_load_failure_is_503() {
        let app = setup_app_with(Arc::new(OfflineLoader));
        let (status, body) = post_json(app, "/embed", json!({"texts": ["hello"]})).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error_type"], "service_unavailable");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("failed to download"));
    }
}
