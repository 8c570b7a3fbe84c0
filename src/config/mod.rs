// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Node configuration from command-line flags and environment variables

use crate::embeddings::{
    HashingLoader, ModelLoader, OnnxModelConfig, OnnxModelLoader, DEFAULT_DIMENSION,
    DEFAULT_MAX_SEQUENCE_LENGTH, DEFAULT_MODEL_ID,
};
use crate::faq::{builtin_corpus, load_corpus, FaqEntry};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// Which embedding backend serves requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// all-MiniLM-L6-v2 through ONNX Runtime
    Onnx,
    /// Offline bag-of-words hashing, no model files needed
    Hashing,
}

/// FAQ Embedding Node
#[derive(Parser, Debug, Clone)]
#[command(name = "faq-embed-node")]
#[command(about = "Sentence embedding and FAQ matching HTTP API", long_about = None)]
pub struct NodeConfig {
    /// Interface to bind
    #[arg(long, env = "FAQ_NODE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "FAQ_NODE_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Embedding backend
    #[arg(long, env = "EMBEDDING_BACKEND", value_enum, default_value_t = BackendKind::Onnx)]
    pub backend: BackendKind,

    /// HuggingFace repository of the embedding model
    #[arg(long, env = "EMBEDDING_MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub model_id: String,

    /// Local ONNX model file (downloaded from the hub when unset)
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Local tokenizer.json (downloaded from the hub when unset)
    #[arg(long, env = "TOKENIZER_PATH")]
    pub tokenizer_path: Option<PathBuf>,

    /// Embedding dimensions the model must produce
    #[arg(long, env = "EMBEDDING_DIMENSIONS", default_value_t = DEFAULT_DIMENSION)]
    pub dimensions: usize,

    /// Token limit per text
    #[arg(long, env = "MAX_SEQUENCE_LENGTH", default_value_t = DEFAULT_MAX_SEQUENCE_LENGTH)]
    pub max_sequence_length: usize,

    /// Upper bound on simultaneous inference calls
    #[arg(long, env = "MAX_CONCURRENT_INFERENCES", default_value_t = 1)]
    pub max_concurrent_inferences: usize,

    /// JSON file with `[{"question", "answer"}]` replacing the built-in FAQ
    #[arg(long, env = "FAQ_PATH")]
    pub faq_path: Option<PathBuf>,

    /// Load the model and FAQ embeddings before accepting requests
    #[arg(long, env = "EAGER_LOAD")]
    pub eager_load: bool,
}

impl NodeConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn onnx_model_config(&self) -> OnnxModelConfig {
        OnnxModelConfig {
            model_id: self.model_id.clone(),
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            dimensions: self.dimensions,
            max_sequence_length: self.max_sequence_length,
        }
    }

    pub fn model_loader(&self) -> Arc<dyn ModelLoader> {
        match self.backend {
            BackendKind::Onnx => Arc::new(OnnxModelLoader::new(self.onnx_model_config())),
            BackendKind::Hashing => Arc::new(
                HashingLoader::new(self.dimensions)
                    .with_max_sequence_length(self.max_sequence_length),
            ),
        }
    }

    /// The FAQ corpus, read once at startup
    pub fn corpus(&self) -> Result<Vec<FaqEntry>> {
        match &self.faq_path {
            Some(path) => load_corpus(path)
                .with_context(|| format!("Failed to load FAQ corpus from {}", path.display())),
            None => Ok(builtin_corpus()),
        }
    }
}
