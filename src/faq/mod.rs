// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! FAQ matching: a fixed question/answer corpus ranked against query
//! embeddings by cosine similarity.

pub mod corpus;
pub mod errors;
pub mod index;
pub mod service;
pub mod similarity;

pub use corpus::{builtin_corpus, load_corpus, FaqEntry};
pub use errors::QueryError;
pub use index::{rank_entries, FaqIndex, FaqIndexEntry, ScoredMatch};
pub use service::QueryService;
pub use similarity::{cosine_similarity, DimensionMismatch};
