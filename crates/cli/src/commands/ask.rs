//! Ask command handler.

use clap::Args;
use paperbrain_core::{config::AppConfig, AppResult};
use paperbrain_knowledge::AnswerOutcome;

/// Ask a single question against the index
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }

        let mut session = super::open_session(&config).await?;

        let outcome = session.ask(&self.question).await?;
        print_outcome(&outcome, self.json)?;

        Ok(())
    }
}

/// Shared answer renderer for the ask and chat commands.
pub fn print_outcome(outcome: &AnswerOutcome, json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    println!("{}", outcome.answer);

    if !outcome.sources.is_empty() {
        println!("\nSources:");
        for source in &outcome.sources {
            println!("- {} (chunk {}): {}", source.document, source.chunk_ordinal, source.excerpt);
        }
    }

    Ok(())
}
