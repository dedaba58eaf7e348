//! LLM provider factory.
//!
//! Creates generation clients from the provider name and endpoint in the
//! application configuration.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, ScriptedClient};
use paperbrain_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create a generation client for the given provider.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "scripted")
/// * `endpoint` - Optional custom endpoint URL
/// * `timeout` - Optional per-request deadline
///
/// # Errors
/// Returns `AppError::Config` for unknown providers.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    timeout: Option<Duration>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let mut client = OllamaClient::with_base_url(base_url);
            if let Some(timeout) = timeout {
                client = client.with_timeout(timeout);
            }
            Ok(Arc::new(client))
        }
        "scripted" => Ok(Arc::new(ScriptedClient::replying(
            "scripted response (no model configured)",
        ))),
        _ => Err(AppError::Config(format!(
            "Unknown generation provider: {}. Supported: ollama, scripted",
            provider
        ))),
    }
}
