//! Command handlers for the PaperBrain CLI.

pub mod ask;
pub mod chat;
pub mod clear;
pub mod ingest;
pub mod stats;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use clear::ClearCommand;
pub use ingest::IngestCommand;
pub use stats::StatsCommand;

use paperbrain_core::{config::AppConfig, AppResult};
use paperbrain_knowledge::{resolve_provider, EmbeddingIndex, Session, Synthesizer};
use paperbrain_llm::create_client;
use paperbrain_prompt::PromptBuilder;
use std::time::Duration;

/// Build a session from the configuration, loading the persisted index
/// bundle when one exists at the configured path.
pub async fn open_session(config: &AppConfig) -> AppResult<Session> {
    let provider = resolve_provider(&config.embedding, &config.endpoint).await?;

    let mut index = EmbeddingIndex::new(provider);
    if config.index_path.exists() {
        index.load(&config.index_path)?;
    }

    let client = create_client(
        "ollama",
        Some(&config.endpoint),
        Some(Duration::from_secs(config.generation.timeout_secs)),
    )?;

    let synthesizer = Synthesizer::new(
        client,
        PromptBuilder::new()?,
        config.model.clone(),
        config.generation.temperature,
        config.generation.max_tokens,
    );

    Ok(Session::new(
        index,
        synthesizer,
        config.chunking.clone(),
        config.top_k,
    ))
}
