// src/error.rs

//! Error types for jdkindex
//!
//! One crate-wide error enum covering configuration problems, index
//! fetching/validation, cache handling, version resolution, and Java home
//! discovery. Variants carry a descriptive message; nothing here is retried
//! automatically.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by jdkindex operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration (insecure index URL, bad version specifier, ...)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Index could not be fetched (request failure or non-success status)
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Fetched index body failed validation (non-ASCII or malformed JSON)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Cached index file unreadable after a successful write; not retried
    #[error("Cache corrupted: {0}")]
    CacheCorrupted(String),

    /// No catalog entry satisfies the requested platform/vendor/version
    #[error("No match: {0}")]
    NoMatch(String),

    /// Directory traversal exhausted without finding a Java home
    #[error("Java home not found: {0}")]
    JavaHomeNotFound(String),

    /// Filesystem or locking failure
    #[error("IO error: {0}")]
    IoError(String),
}
