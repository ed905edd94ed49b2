//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown district; uploads require an existing district
    #[error("Unknown district '{0}'. Create it first with `pragati district create`.")]
    UnknownDistrict(String),

    /// Versioned store error
    #[error("Store error: {0}")]
    Store(#[from] pragati_store::StoreError),

    /// Extraction pipeline error
    #[error(transparent)]
    Pipeline(#[from] pragati_extractor::PipelineError),

    /// Chat error
    #[error(transparent)]
    Chat(#[from] pragati_extractor::ChatError),

    /// Completion client error
    #[error("LLM error: {0}")]
    Llm(#[from] pragati_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
