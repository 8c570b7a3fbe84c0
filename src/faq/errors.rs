// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for FAQ queries

use crate::embeddings::EmbeddingError;
use crate::faq::similarity::DimensionMismatch;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Caller-correctable request problem, detected before any model work
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// Model load or inference failure, propagated unchanged
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Query and index vectors disagree on length; indicates a bug
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),
}

impl QueryError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors the client can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::InvalidInput { .. })
    }
}
