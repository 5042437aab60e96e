//! Common error types for Redline

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Redline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Redline backend
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (corrupt row, broken invariant)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Catalog source file does not exist at the configured location
    #[error("Catalog source not found: {0}")]
    SourceNotFound(PathBuf),

    /// Catalog source exists but cannot be decoded (bad header, bad row)
    #[error("Catalog source malformed: {0}")]
    SourceMalformed(String),

    /// Could not open a transaction against the catalog store
    #[error("Catalog store unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    /// The reconciliation batch failed and was rolled back
    #[error("Catalog transaction failed (batch rolled back): {0}")]
    StorageTransactionFailed(#[source] sqlx::Error),
}
