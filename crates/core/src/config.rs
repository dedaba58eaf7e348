//! Configuration management for the PaperBrain CLI.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - A YAML config file (`paperbrain.yaml`)
//! - Environment variables (`PAPERBRAIN_*`)
//! - Command-line flags
//!
//! CLI flags win over environment variables, which win over the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Chunking parameters for the document splitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between adjacent chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    1500
}

fn default_chunk_overlap() -> usize {
    200
}

/// Embedding provider settings, including the model fallback list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider backend: "ollama" or "trigram" (offline, deterministic)
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Ordered model fallback list: primary first, at most two alternates.
    /// Consulted once when the index is constructed; the first model that
    /// responds stays fixed for the index instance's lifetime.
    #[serde(default = "default_embedding_models")]
    pub models: Vec<String>,

    /// Vector dimension for the offline provider; HTTP providers report
    /// their own dimension from the probe embedding.
    #[serde(default = "default_embedding_dim")]
    pub dimensions: usize,

    /// Per-request deadline in seconds
    #[serde(default = "default_embed_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            models: default_embedding_models(),
            dimensions: default_embedding_dim(),
            timeout_secs: default_embed_timeout(),
        }
    }
}

fn default_embedding_provider() -> String {
    "ollama".to_string()
}

fn default_embedding_models() -> Vec<String> {
    vec![
        "all-minilm".to_string(),
        "nomic-embed-text".to_string(),
        "snowflake-arctic-embed".to_string(),
    ]
}

fn default_embedding_dim() -> usize {
    384
}

fn default_embed_timeout() -> u64 {
    30
}

/// Generative model settings for answer synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature (low for factual answers)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request deadline in seconds
    #[serde(default = "default_gen_timeout")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_gen_timeout(),
        }
    }
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_gen_timeout() -> u64 {
    120
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Path to the persisted index bundle
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Base URL for the Ollama-compatible API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Generative model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Number of chunks to retrieve per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    /// Log level override
    #[serde(skip)]
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    #[serde(skip)]
    pub verbose: bool,

    /// Disable colored output
    #[serde(skip)]
    pub no_color: bool,
}

fn default_index_path() -> PathBuf {
    PathBuf::from(".paperbrain/index.json")
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_top_k() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            index_path: default_index_path(),
            endpoint: default_endpoint(),
            model: default_model(),
            top_k: default_top_k(),
            chunking: ChunkingConfig::default(),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `PAPERBRAIN_CONFIG`: path to config file (default: `paperbrain.yaml`)
    /// - `PAPERBRAIN_INDEX`: index bundle path
    /// - `PAPERBRAIN_ENDPOINT`: Ollama-compatible API base URL
    /// - `PAPERBRAIN_MODEL`: generative model
    /// - `PAPERBRAIN_EMBEDDING_PROVIDER`: embedding backend
    /// - `PAPERBRAIN_EMBEDDING_MODEL`: primary embedding model (prepended
    ///   to the fallback list)
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration, preferring an explicitly named config file.
    ///
    /// The file resolution order is: the `config_file` argument (the
    /// `--config` flag), then `PAPERBRAIN_CONFIG`, then `paperbrain.yaml`
    /// in the working directory. Only the explicitly named file is
    /// required to exist; the defaults are optional.
    pub fn load_from(config_file: Option<&std::path::Path>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file.map(std::path::Path::to_path_buf);

        if config.config_file.is_none() {
            if let Ok(env_file) = std::env::var("PAPERBRAIN_CONFIG") {
                config.config_file = Some(PathBuf::from(env_file));
            }
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("paperbrain.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file {:?} not found",
                config_path
            )));
        }

        // Environment variables override the YAML file
        if let Ok(index) = std::env::var("PAPERBRAIN_INDEX") {
            config.index_path = PathBuf::from(index);
        }

        if let Ok(endpoint) = std::env::var("PAPERBRAIN_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("PAPERBRAIN_MODEL") {
            config.model = model;
        }

        if let Ok(provider) = std::env::var("PAPERBRAIN_EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }

        if let Ok(model) = std::env::var("PAPERBRAIN_EMBEDDING_MODEL") {
            config.set_primary_embedding_model(model);
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut parsed: AppConfig = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        parsed.config_file = Some(path.clone());
        Ok(parsed)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        index_path: Option<PathBuf>,
        endpoint: Option<String>,
        model: Option<String>,
        embedding_model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(index_path) = index_path {
            self.index_path = index_path;
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(embedding_model) = embedding_model {
            self.set_primary_embedding_model(embedding_model);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Promote a model to the front of the embedding fallback list.
    fn set_primary_embedding_model(&mut self, model: String) {
        self.embedding.models.retain(|m| m != &model);
        self.embedding.models.insert(0, model);
        self.embedding.models.truncate(3);
    }

    /// Validate the configuration before use.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunking.chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be positive".to_string()));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be positive".to_string()));
        }

        if self.embedding.models.is_empty() {
            return Err(AppError::Config(
                "embedding.models must list at least one model".to_string(),
            ));
        }

        if self.embedding.models.len() > 3 {
            return Err(AppError::Config(
                "embedding.models supports a primary model plus at most two fallbacks".to_string(),
            ));
        }

        let known_providers = ["ollama", "trigram"];
        if !known_providers.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_providers.join(", ")
            )));
        }

        Ok(())
    }
}
