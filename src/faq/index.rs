// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! FAQ index: the corpus plus its question embeddings
//!
//! Question embeddings are computed once, on the first ranking request or on
//! an explicit [`FaqIndex::warm_up`], through a single batched call in corpus
//! order. They are never invalidated since the corpus cannot change. The
//! computation runs in a background task so an abandoned request does not
//! throw away a half-finished batch.

use crate::embeddings::{DetachedOnce, EmbeddingError, EmbeddingProvider};
use crate::faq::corpus::FaqEntry;
use crate::faq::errors::QueryError;
use crate::faq::similarity::{cosine_similarity, DimensionMismatch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct FaqIndexEntry {
    pub entry: FaqEntry,
    pub embedding: Vec<f32>,
}

/// One ranked FAQ answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub question: String,
    pub answer: String,
    pub score: f32,
}

/// Scores every entry against `query_vector` and returns the best `top_k`
///
/// Sorted by descending score; equal scores keep corpus order. `top_k` is
/// clamped to at least 1 and at most `entries.len()`.
pub fn rank_entries(
    entries: &[FaqIndexEntry],
    query_vector: &[f32],
    top_k: usize,
) -> Result<Vec<ScoredMatch>, DimensionMismatch> {
    let mut scored: Vec<(&FaqIndexEntry, f32)> = entries
        .iter()
        .map(|indexed| cosine_similarity(query_vector, &indexed.embedding).map(|s| (indexed, s)))
        .collect::<Result<_, _>>()?;

    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(scored
        .into_iter()
        .take(top_k.max(1))
        .map(|(indexed, score)| ScoredMatch {
            question: indexed.entry.question.clone(),
            answer: indexed.entry.answer.clone(),
            score,
        })
        .collect())
}

pub struct FaqIndex {
    corpus: Arc<Vec<FaqEntry>>,
    provider: Arc<EmbeddingProvider>,
    entries: DetachedOnce<Arc<Vec<FaqIndexEntry>>>,
}

impl std::fmt::Debug for FaqIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaqIndex")
            .field("corpus_size", &self.corpus.len())
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

impl FaqIndex {
    pub fn new(corpus: Vec<FaqEntry>, provider: Arc<EmbeddingProvider>) -> Self {
        Self {
            corpus: Arc::new(corpus),
            provider,
            entries: DetachedOnce::new(),
        }
    }

    pub fn corpus(&self) -> &[FaqEntry] {
        &self.corpus
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// Whether question embeddings have been computed
    pub fn is_ready(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Cached index entries, computing them on first call
    ///
    /// Concurrent first callers share one computation.
    pub async fn entries(&self) -> Result<Arc<Vec<FaqIndexEntry>>, EmbeddingError> {
        self.entries
            .get_or_spawn(
                || {
                    let corpus = self.corpus.clone();
                    let provider = self.provider.clone();
                    async move {
                        info!("Computing embeddings for {} FAQ questions", corpus.len());
                        let started = Instant::now();

                        let questions: Vec<String> =
                            corpus.iter().map(|e| e.question.clone()).collect();
                        let embeddings = provider.embed_many(&questions).await?;

                        info!(
                            "FAQ index ready in {:.2}s",
                            started.elapsed().as_secs_f64()
                        );

                        Ok::<_, EmbeddingError>(Arc::new(
                            corpus
                                .iter()
                                .cloned()
                                .zip(embeddings)
                                .map(|(entry, embedding)| FaqIndexEntry { entry, embedding })
                                .collect::<Vec<_>>(),
                        ))
                    }
                },
                EmbeddingError::Inference,
            )
            .await
    }

    pub async fn warm_up(&self) -> Result<(), EmbeddingError> {
        self.entries().await.map(|_| ())
    }

    /// Ranks the corpus against an already-embedded query
    pub async fn rank(
        &self,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>, QueryError> {
        if self.corpus.is_empty() {
            return Ok(Vec::new());
        }

        let entries = self.entries().await?;
        Ok(rank_entries(&entries, query_vector, top_k)?)
    }
}
