//! Error types and result aliases for the studio library.
//!
//! Every fallible library call returns [`Result<T>`]. The HTTP surface maps
//! these into its own response errors; the analysis client folds them into a
//! tagged outcome instead of propagating them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StudioError>;
