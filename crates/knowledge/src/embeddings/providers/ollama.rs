//! Ollama embedding provider.
//!
//! Uses the `/api/embed` endpoint of an Ollama-compatible runtime.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::embeddings::EmbeddingProvider;
use paperbrain_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedding client bound to one model on one endpoint.
///
/// The model and its dimension are fixed by a probe embedding at
/// connect time and never change for the lifetime of the instance.
#[derive(Debug)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Connect to the runtime and probe the model once.
    ///
    /// The probe both verifies the model is available and discovers its
    /// vector dimension. Fails with `EmbeddingUnavailable` when the
    /// model does not respond, `EmbeddingTimeout` on deadline.
    pub async fn connect(base_url: &str, model: &str, timeout: Duration) -> AppResult<Self> {
        let mut embedder = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dimensions: 0,
            timeout,
            client: reqwest::Client::new(),
        };

        let probe = ["dimension probe".to_string()];
        let vectors = embedder.request_embeddings(&probe).await?;
        let dimensions = vectors
            .first()
            .map(|v| v.len())
            .filter(|len| *len > 0)
            .ok_or_else(|| {
                AppError::EmbeddingUnavailable(format!("model '{}' returned no probe vector", model))
            })?;

        embedder.dimensions = dimensions;
        Ok(embedder)
    }

    async fn request_embeddings(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let request = OllamaEmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = tokio::time::timeout(self.timeout, self.post(&request))
            .await
            .map_err(|_| {
                AppError::EmbeddingTimeout(format!(
                    "no response from {} within {}s",
                    self.base_url,
                    self.timeout.as_secs()
                ))
            })??;

        if response.embeddings.len() != texts.len() {
            return Err(AppError::EmbeddingUnavailable(format!(
                "model '{}' returned {} vectors for {} texts",
                self.model,
                response.embeddings.len(),
                texts.len()
            )));
        }

        Ok(response.embeddings)
    }

    async fn post(&self, request: &OllamaEmbedRequest<'_>) -> AppResult<OllamaEmbedResponse> {
        let url = format!("{}/api/embed", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                AppError::EmbeddingUnavailable(format!("failed to reach {}: {}", url, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::EmbeddingUnavailable(format!(
                "embedding API error ({}): {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::EmbeddingUnavailable(format!("failed to parse embedding response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            "Embedding {} texts with model '{}'",
            texts.len(),
            self.model
        );

        let vectors = self.request_embeddings(texts).await?;

        for vector in &vectors {
            if vector.len() != self.dimensions {
                return Err(AppError::EmbeddingUnavailable(format!(
                    "model '{}' changed dimension mid-flight ({} != {})",
                    self.model,
                    vector.len(),
                    self.dimensions
                )));
            }
        }

        Ok(vectors)
    }
}
