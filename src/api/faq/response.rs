// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use crate::faq::ScoredMatch;
use serde::{Deserialize, Serialize};

/// Response body for POST /faq
///
/// # Example
/// ```json
/// {
///   "matches": [
///     { "question": "How can I make a donation", "answer": "...", "score": 0.71 }
///   ],
///   "query": "How can I donate money?",
///   "processing_time_seconds": 0.008
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqResponse {
    /// Best matches first
    pub matches: Vec<ScoredMatch>,
    pub query: String,
    pub processing_time_seconds: f64,
}
