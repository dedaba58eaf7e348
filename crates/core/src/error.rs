//! Error types for the PaperBrain CLI.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: document extraction, chunking, embedding, index
//! persistence, answer generation, and configuration.

use thiserror::Error;

/// Unified error type for the PaperBrain CLI.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is not one of the supported document formats
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Format-specific text extraction failed (corrupt or empty file)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Every configured embedding model in the fallback list failed
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Embedding request exceeded its deadline
    #[error("Embedding timed out: {0}")]
    EmbeddingTimeout(String),

    /// Persisted index bundle failed structural validation on load
    #[error("Corrupt index state: {0}")]
    CorruptState(String),

    /// Generative model call failed (transport, quota, model)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Generation request exceeded its deadline
    #[error("Generation timed out: {0}")]
    GenerationTimeout(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::UnsupportedFormat("epub".to_string());
        assert_eq!(err.to_string(), "Unsupported format: epub");

        let err = AppError::CorruptState("bad checksum".to_string());
        assert!(err.to_string().contains("bad checksum"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io_err.into();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
