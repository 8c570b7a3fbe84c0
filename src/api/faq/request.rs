// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! FaqRequest type for POST /faq

use crate::api::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TOP_K: usize = 1;

/// Request body for POST /faq
///
/// # Example
/// ```json
/// { "query": "How can I donate money?", "top_k": 3 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqRequest {
    #[serde(default)]
    pub query: Option<Value>,

    /// Number of matches to return (default 1)
    #[serde(default)]
    pub top_k: Option<Value>,
}

impl FaqRequest {
    pub fn new(query: impl Into<String>, top_k: Option<usize>) -> Self {
        Self {
            query: Some(Value::String(query.into())),
            top_k: top_k.map(Value::from),
        }
    }

    /// Validates field types and returns `(query, top_k)`
    ///
    /// Emptiness of the query is checked by the query service, so an empty
    /// string passes here.
    pub fn validate(self) -> Result<(String, usize), ApiError> {
        let query = match self.query {
            None | Some(Value::Null) => {
                return Err(ApiError::validation("query", "Please provide a query"))
            }
            Some(Value::String(query)) => query,
            Some(_) => return Err(ApiError::validation("query", "Query must be a string")),
        };

        let top_k = match self.top_k {
            None | Some(Value::Null) => DEFAULT_TOP_K,
            Some(value) => value
                .as_u64()
                .filter(|&k| k >= 1)
                .and_then(|k| usize::try_from(k).ok())
                .ok_or_else(|| ApiError::validation("top_k", "top_k must be a positive integer"))?,
        };

        Ok((query, top_k))
    }
}
