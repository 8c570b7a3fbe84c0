// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX model tests against the real all-MiniLM-L6-v2
//!
//! These tests download the model from the HuggingFace Hub on first run
//! (cached afterwards), so they are ignored by default:
//!
//! ```text
//! cargo test --test embeddings_tests -- --ignored
//! ```

use faq_embed_node::embeddings::onnx_model::INFERENCE_CHUNK_SIZE;
use faq_embed_node::embeddings::{
    EmbeddingProvider, OnnxModelConfig, OnnxModelLoader, DEFAULT_DIMENSION,
};
use faq_embed_node::faq::{builtin_corpus, FaqIndex, QueryService};
use std::sync::Arc;

/// Helper: service backed by the hub-downloaded model
fn setup_real_service() -> QueryService {
    let loader = Arc::new(OnnxModelLoader::new(OnnxModelConfig::default()));
    let provider = Arc::new(EmbeddingProvider::new(loader, 1));
    let index = Arc::new(FaqIndex::new(builtin_corpus(), provider.clone()));
    QueryService::new(provider, index)
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod onnx_model_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2 from the HuggingFace Hub"]
    async fn test_real_model_dimensions_and_norm() {
        let service = setup_real_service();

        let info = service.model_info().await.expect("Failed to load model");
        assert_eq!(info.model_name, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(info.embedding_dimensions, DEFAULT_DIMENSION);

        let embeddings = service
            .batch_embed(&["Hello world".to_string()])
            .await
            .unwrap();
        assert_eq!(embeddings[0].len(), 384);
        assert!((norm(&embeddings[0]) - 1.0).abs() < 1e-3);
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2 from the HuggingFace Hub"]
    async fn test_donation_query_matches_donation_faq() {
        let service = setup_real_service();

        let matches = service
            .answer_query("How can I donate money?", 1)
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].question, "How can I make a donation");
        assert!(matches[0].score > 0.5, "score was {}", matches[0].score);
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2 from the HuggingFace Hub"]
    async fn test_nid_query_ranks_nid_faq_first() {
        let service = setup_real_service();

        let matches = service
            .answer_query("I do not have a national ID card", 3)
            .await
            .unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].question, "What if I don't have an NID?");
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2 from the HuggingFace Hub"]
    async fn test_batch_matches_single_embeddings() {
        let service = setup_real_service();
        let texts = vec![
            "short".to_string(),
            "a considerably longer sentence that forces padding in the batch".to_string(),
        ];

        let batch = service.batch_embed(&texts).await.unwrap();
        for (text, batched) in texts.iter().zip(&batch) {
            let single = service.batch_embed(&[text.clone()]).await.unwrap();
            let max_diff = single[0]
                .iter()
                .zip(batched)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0f32, f32::max);
            assert!(max_diff < 1e-4, "padding changed embedding by {}", max_diff);
        }
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2 from the HuggingFace Hub"]
    async fn test_batch_larger_than_one_chunk() {
        let service = setup_real_service();
        let texts: Vec<String> = (0..INFERENCE_CHUNK_SIZE * 2 + 3)
            .map(|i| format!("FAQ question number {}", i))
            .collect();

        let batch = service.batch_embed(&texts).await.unwrap();
        assert_eq!(batch.len(), texts.len());

        let last = texts.len() - 1;
        let single = service.batch_embed(&[texts[last].clone()]).await.unwrap();
        let max_diff = single[0]
            .iter()
            .zip(&batch[last])
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_diff < 1e-4, "chunked embedding differs by {}", max_diff);
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2 from the HuggingFace Hub"]
    async fn test_long_text_is_truncated() {
        let service = setup_real_service();
        let long_text = "donation ".repeat(2000);

        let embeddings = service.batch_embed(&[long_text]).await.unwrap();
        assert_eq!(embeddings[0].len(), 384);
    }
}
