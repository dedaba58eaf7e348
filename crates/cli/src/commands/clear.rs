//! Clear command handler.

use clap::Args;
use paperbrain_core::{config::AppConfig, AppResult};

/// Delete the index bundle
#[derive(Args, Debug)]
pub struct ClearCommand {}

impl ClearCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        if config.index_path.exists() {
            std::fs::remove_file(&config.index_path)?;
            println!("Deleted index at {}", config.index_path.display());
        } else {
            println!("No index at {} (nothing to clear)", config.index_path.display());
        }

        Ok(())
    }
}
