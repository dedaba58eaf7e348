//! Stats command handler.

use clap::Args;
use paperbrain_core::{config::AppConfig, AppResult};
use paperbrain_knowledge::inspect_bundle;

/// Show index statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        if !config.index_path.exists() {
            if self.json {
                println!("{}", serde_json::json!({ "indexed": false }));
            } else {
                println!("No index at {} (run ingest first)", config.index_path.display());
            }
            return Ok(());
        }

        let stats = inspect_bundle(&config.index_path)?;

        if self.json {
            let output = serde_json::json!({
                "indexed": true,
                "index": config.index_path.display().to_string(),
                "embeddingModel": stats.model,
                "dimension": stats.dimension,
                "chunks": stats.chunk_count,
                "documents": stats.document_count,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Index: {}", config.index_path.display());
            println!("  Embedding model: {}", stats.model);
            println!("  Dimension: {}", stats.dimension);
            println!("  Chunks: {}", stats.chunk_count);
            println!("  Documents: {}", stats.document_count);
        }

        Ok(())
    }
}
