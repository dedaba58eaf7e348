//! Embedding providers and the model fallback chain.

pub mod providers;

pub use providers::{OllamaEmbedder, TrigramEmbedder};

use paperbrain_core::config::EmbeddingConfig;
use paperbrain_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Trait for embedding providers.
///
/// `embed_batch` returns one fixed-dimension vector per input text, in
/// input order. A provider's model and dimension are fixed at
/// construction and never change afterwards; mixing dimensions inside
/// one index is an invariant violation.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Provider backend name (e.g., "ollama", "trigram")
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;

    /// Embedding vector dimension
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in one batch call.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let texts = [text.to_string()];
        let mut results = self.embed_batch(&texts).await?;
        results
            .pop()
            .ok_or_else(|| AppError::EmbeddingUnavailable("no embedding returned".to_string()))
    }
}

/// Resolve an embedding provider from configuration.
///
/// The configured model list (primary plus at most two alternates) is
/// consulted exactly once, here: each candidate is probed with a
/// one-text embedding, and the first that responds is fixed for the
/// lifetime of whatever index is built on top of it. There is no
/// per-call fallback. All candidates failing is `EmbeddingUnavailable`.
pub async fn resolve_provider(
    config: &EmbeddingConfig,
    endpoint: &str,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "trigram" => {
            let provider = TrigramEmbedder::new(config.dimensions);
            tracing::debug!(
                "Using offline trigram embedder ({} dimensions)",
                provider.dimensions()
            );
            Ok(Arc::new(provider))
        }

        "ollama" => {
            let timeout = Duration::from_secs(config.timeout_secs);
            let mut failures = Vec::new();

            for (attempt, model) in config.models.iter().enumerate() {
                match OllamaEmbedder::connect(endpoint, model, timeout).await {
                    Ok(provider) => {
                        if attempt > 0 {
                            tracing::warn!(
                                "Primary embedding model unavailable; fell back to '{}'",
                                model
                            );
                        } else {
                            tracing::debug!(
                                "Embedding model '{}' ready ({} dimensions)",
                                model,
                                provider.dimensions()
                            );
                        }
                        return Ok(Arc::new(provider));
                    }
                    Err(e) => {
                        tracing::warn!("Embedding model '{}' unavailable: {}", model, e);
                        failures.push(format!("{}: {}", model, e));
                    }
                }
            }

            Err(AppError::EmbeddingUnavailable(format!(
                "all configured models failed ({})",
                failures.join("; ")
            )))
        }

        other => Err(AppError::Config(format!(
            "Unknown embedding provider: {}. Supported: ollama, trigram",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_trigram_provider() {
        let config = EmbeddingConfig {
            provider: "trigram".to_string(),
            ..EmbeddingConfig::default()
        };

        let provider = resolve_provider(&config, "http://localhost:11434")
            .await
            .unwrap();
        assert_eq!(provider.provider_name(), "trigram");
        assert_eq!(provider.dimensions(), 384);
    }

    #[tokio::test]
    async fn test_resolve_unknown_provider() {
        let config = EmbeddingConfig {
            provider: "faiss".to_string(),
            ..EmbeddingConfig::default()
        };

        let result = resolve_provider(&config, "http://localhost:11434").await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_exhausted_fallback_chain_is_embedding_unavailable() {
        // Unroutable endpoint per RFC 5737: every candidate model fails
        let config = EmbeddingConfig {
            provider: "ollama".to_string(),
            models: vec!["a".to_string(), "b".to_string()],
            timeout_secs: 1,
            ..EmbeddingConfig::default()
        };

        let result = resolve_provider(&config, "http://192.0.2.1:11434").await;
        match result {
            Err(AppError::EmbeddingUnavailable(msg)) => {
                assert!(msg.contains("a:"));
                assert!(msg.contains("b:"));
            }
            other => panic!("expected EmbeddingUnavailable, got {:?}", other.map(|p| p.provider_name().to_string())),
        }
    }

    #[tokio::test]
    async fn test_embed_single_convenience() {
        let provider = TrigramEmbedder::new(64);
        let vector = provider.embed("hello world").await.unwrap();
        assert_eq!(vector.len(), 64);
    }
}
