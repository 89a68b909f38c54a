//! Error types for vidsearch.

use thiserror::Error;

/// Library-level error type for vidsearch operations.
#[derive(Error, Debug)]
pub enum VidsearchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load embedding model: {0}")]
    ModelLoad(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Count mismatch: {vectors} vectors but {entries} metadata entries")]
    CountMismatch { vectors: usize, entries: usize },

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for vidsearch operations.
pub type Result<T> = std::result::Result<T, VidsearchError>;
