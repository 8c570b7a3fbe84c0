// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedRequest type for POST /embed
//!
//! `texts` is kept as raw JSON so that shape errors become the same 400
//! message clients already handle, instead of a generic rejection.

use crate::api::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message returned for a missing or empty `texts` field
pub const MISSING_TEXTS_MESSAGE: &str = "Please provide texts to embed";

/// Request body for POST /embed
///
/// # Example
/// ```json
/// { "texts": ["Hello world", "Another text"] }
/// ```
/// A bare string is accepted and treated as a one-element list:
/// ```json
/// { "texts": "Hello world" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedRequest {
    #[serde(default)]
    pub texts: Option<Value>,
}

impl EmbedRequest {
    pub fn new(texts: Vec<String>) -> Self {
        Self {
            texts: Some(Value::from(texts)),
        }
    }

    /// Validates the request and returns the texts to embed
    ///
    /// # Validation Rules
    /// 1. `texts` must be present and not null
    /// 2. a non-empty string is normalized to a one-element list
    /// 3. a list must be non-empty and contain only strings
    pub fn into_texts(self) -> Result<Vec<String>, ApiError> {
        match self.texts {
            None | Some(Value::Null) => Err(ApiError::validation("texts", MISSING_TEXTS_MESSAGE)),
            Some(Value::String(text)) if text.is_empty() => {
                Err(ApiError::validation("texts", MISSING_TEXTS_MESSAGE))
            }
            Some(Value::String(text)) => Ok(vec![text]),
            Some(Value::Array(items)) => {
                if items.is_empty() {
                    return Err(ApiError::validation("texts", MISSING_TEXTS_MESSAGE));
                }
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| match item {
                        Value::String(text) => Ok(text),
                        _ => Err(ApiError::validation(
                            format!("texts[{}]", index),
                            "texts must contain only strings",
                        )),
                    })
                    .collect()
            }
            Some(_) => Err(ApiError::validation(
                "texts",
                "texts must be a string or an array of strings",
            )),
        }
    }
}
