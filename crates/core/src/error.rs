//! Error types for the Airguide assistant.
//!
//! This module defines a unified error enum covering all error categories
//! in the application: configuration, I/O, the embedding and index
//! collaborators, ingestion, and serialization.

use thiserror::Error;

/// Unified error type for the Airguide assistant.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
///
/// Configuration errors are fatal at startup; per-source ingestion errors
/// are caught and logged by the ingestion manager; retrieval-side
/// collaborator failures degrade to empty results and never reach callers
/// of the query path as errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (invalid chunk overlap, dimension mismatch)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding collaborator errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index collaborator errors
    #[error("Index error: {0}")]
    Index(String),

    /// Document ingestion errors (extraction, chunking)
    #[error("Ingestion error: {0}")]
    Ingest(String),

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
