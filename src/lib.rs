// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod faq;
pub mod version;

pub use api::{create_router, start_server, AppState};
pub use config::{BackendKind, NodeConfig};
pub use embeddings::{
    EmbeddingBackend, EmbeddingError, EmbeddingProvider, ModelInfo, ModelLoader, ProviderState,
};
pub use faq::{FaqEntry, FaqIndex, QueryError, QueryService, ScoredMatch};
