//! PaperBrain CLI
//!
//! Main entry point for the paperbrain command-line tool.
//! Ingest documents into a local vector index and ask questions against
//! them, with answers grounded in retrieved chunks and cited per source.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, ClearCommand, IngestCommand, StatsCommand};
use paperbrain_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// PaperBrain - question answering over your own documents
#[derive(Parser, Debug)]
#[command(name = "paperbrain")]
#[command(about = "Question answering over your own documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "PAPERBRAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the index bundle
    #[arg(short, long, global = true, env = "PAPERBRAIN_INDEX")]
    index: Option<PathBuf>,

    /// Base URL of the Ollama-compatible API
    #[arg(long, global = true, env = "PAPERBRAIN_ENDPOINT")]
    endpoint: Option<String>,

    /// Generative model identifier
    #[arg(short, long, global = true, env = "PAPERBRAIN_MODEL")]
    model: Option<String>,

    /// Primary embedding model (alternates stay as fallbacks)
    #[arg(long, global = true, env = "PAPERBRAIN_EMBEDDING_MODEL")]
    embedding_model: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest documents into the index
    Ingest(IngestCommand),

    /// Ask a single question against the index
    Ask(AskCommand),

    /// Interactive question-answering session
    Chat(ChatCommand),

    /// Show index statistics
    Stats(StatsCommand),

    /// Delete the index bundle
    Clear(ClearCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration; the --config flag wins over
    // PAPERBRAIN_CONFIG and the default paperbrain.yaml
    let config = AppConfig::load_from(cli.config.as_deref())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.index,
        cli.endpoint,
        cli.model,
        cli.embedding_model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Endpoint: {}", config.endpoint);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Index: {}", config.index_path.display());

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Stats(_) => "stats",
        Commands::Clear(_) => "clear",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
        Commands::Clear(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::debug!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    Ok(result?)
}
