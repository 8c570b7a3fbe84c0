// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use faq_embed_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    embeddings::EmbeddingProvider,
    faq::{FaqIndex, QueryService},
    version,
};
use std::{env, sync::Arc};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = NodeConfig::parse();

    info!("Starting {}", version::get_version_string());
    info!("Build: {}", version::VERSION);
    info!("Features: {}", version::FEATURES.join(", "));
    info!(
        "Backend: {:?}, model: {}, dimensions: {}",
        config.backend, config.model_id, config.dimensions
    );

    let corpus = config.corpus()?;
    info!("Loaded FAQ corpus with {} entries", corpus.len());

    let provider = Arc::new(EmbeddingProvider::new(
        config.model_loader(),
        config.max_concurrent_inferences,
    ));
    let index = Arc::new(FaqIndex::new(corpus, provider.clone()));
    let service = Arc::new(QueryService::new(provider, index));

    if config.eager_load {
        info!("Eager load requested, loading model and FAQ embeddings...");
        match service.warm_up().await {
            Ok(()) => info!("Model and FAQ embeddings ready"),
            // Requests will retry the load on demand
            Err(e) => warn!("Eager load failed: {}", e),
        }
    } else {
        info!("Model will load on first request");
    }

    start_server(config.socket_addr(), AppState::new(service)).await
}
