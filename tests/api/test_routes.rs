// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration, CORS and auxiliary endpoint tests
//!
//! These tests verify that:
//! - Every endpoint answers at the root and under /api
//! - Wrong verbs get a JSON 405, unknown paths a JSON 404
//! - CORS preflights succeed and responses carry CORS headers
//! - /health never loads the model while /info does

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use faq_embed_node::{
    api::{create_router, AppState},
    embeddings::{EmbeddingProvider, HashingLoader},
    faq::{builtin_corpus, FaqIndex, QueryService},
    version,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

const DIM: usize = 48;

/// Helper: router plus the service behind it
fn setup_app() -> (Router, Arc<QueryService>) {
    let provider = Arc::new(EmbeddingProvider::new(Arc::new(HashingLoader::new(DIM)), 1));
    let index = Arc::new(FaqIndex::new(builtin_corpus(), provider.clone()));
    let service = Arc::new(QueryService::new(provider, index));
    (create_router(AppState::new(service.clone())), service)
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[cfg(test)]
mod route_tests {
    use super::*;

    // ========== METHOD HANDLING ==========

    #[tokio::test]
    async fn test_wrong_verb_is_405() {
        let cases = [
            (Method::GET, "/embed"),
            (Method::GET, "/faq"),
            (Method::POST, "/info"),
            (Method::DELETE, "/api/embed"),
            (Method::PUT, "/api/faq"),
            (Method::POST, "/api"),
        ];

        for (method, uri) in cases {
            let (app, _) = setup_app();
            let (status, body) = send(app, method.clone(), uri).await;

            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
            assert_eq!(body["error"], "Method not allowed");
            assert_eq!(body["error_type"], "method_not_allowed");
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (app, _) = setup_app();
        let (status, body) = send(app, Method::GET, "/does-not-exist").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_type"], "not_found");
    }

    // ========== CORS ==========

    #[tokio::test]
    async fn test_preflight_allowed() {
        for uri in ["/embed", "/api/faq"] {
            let (app, service) = setup_app();
            let response = app
                .oneshot(
                    Request::builder()
                        .method(Method::OPTIONS)
                        .uri(uri)
                        .header(header::ORIGIN, "https://example.org")
                        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "preflight for {}", uri);
            let headers = response.headers();
            assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
                .to_str()
                .unwrap();
            assert!(methods.contains("POST"), "allowed methods: {}", methods);
            assert!(!service.provider().is_ready());
        }
    }

    #[tokio::test]
    async fn test_simple_response_has_cors_header() {
        let (app, _) = setup_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://example.org")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    // ========== AUXILIARY ENDPOINTS ==========

    #[tokio::test]
    async fn test_health_does_not_load_model() {
        let (app, service) = setup_app();
        let (status, body) = send(app, Method::GET, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model_state"], "unloaded");
        assert_eq!(body["model_loaded"], false);
        assert_eq!(body["faq_index_ready"], false);
        assert_eq!(body["faq_entries"], 10);
        assert!(!service.provider().is_ready());
    }

    #[tokio::test]
    async fn test_health_after_warm_up() {
        let (app, service) = setup_app();
        service.warm_up().await.unwrap();

        let (_, body) = send(app, Method::GET, "/api/health").await;
        assert_eq!(body["model_state"], "ready");
        assert_eq!(body["model_loaded"], true);
        assert_eq!(body["faq_index_ready"], true);
    }

    #[tokio::test]
    async fn test_info_loads_model() {
        for uri in ["/info", "/api/info"] {
            let (app, service) = setup_app();
            let (status, body) = send(app, Method::GET, uri).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["model_name"], "hashing-bag-of-words");
            assert_eq!(body["embedding_dimensions"], DIM);
            assert_eq!(body["max_sequence_length"], 256);
            assert!(service.provider().is_ready());
        }
    }

    #[tokio::test]
    async fn test_api_index_lists_endpoints() {
        let (app, _) = setup_app();
        let (status, body) = send(app, Method::GET, "/api").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], version::SERVICE_NAME);
        assert_eq!(body["version"], version::VERSION_NUMBER);
        assert_eq!(body["build"], version::VERSION);
        let features: Vec<&str> = body["features"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_str().unwrap())
            .collect();
        assert_eq!(features, version::FEATURES);

        let paths: Vec<&str> = body["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"/api/embed"));
        assert!(paths.contains(&"/api/faq"));
        assert!(paths.contains(&"/api/info"));
    }
}
