//! Custom error types for lmsync
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for lmsync operations
#[derive(Error, Debug)]
pub enum LmSyncError {
    /// LM Studio unreachable or the API returned a failure status
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected model-list shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// Existing target file could not be read or parsed
    #[error("Target file error: {0}")]
    TargetFile(String),

    /// Backup copy could not be created
    #[error("Backup error: {0}")]
    Backup(String),

    /// Target file could not be written
    #[error("Write error: {0}")]
    WriteFile(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for lmsync operations
pub type Result<T> = std::result::Result<T, LmSyncError>;

impl LmSyncError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a target file error
    pub fn target_file(msg: impl Into<String>) -> Self {
        Self::TargetFile(msg.into())
    }

    /// Create a backup error
    pub fn backup(msg: impl Into<String>) -> Self {
        Self::Backup(msg.into())
    }

    /// Create a write error
    pub fn write_file(msg: impl Into<String>) -> Self {
        Self::WriteFile(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
