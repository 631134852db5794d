//! Common error types for the showroom crates

use thiserror::Error;

/// Common result type for showroom operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the showroom crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested document or blob not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document store rejected the operation
    #[error("Document store error: {0}")]
    Store(String),

    /// Blob store rejected the operation
    #[error("Blob store error: {0}")]
    Blob(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
