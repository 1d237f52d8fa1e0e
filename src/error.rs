//! Error types for the inbox core.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Mail source errors.
///
/// Only `ListFailed` is fatal for a fetch batch. Per-message variants are
/// logged and the message is dropped.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Listing messages from {source_name} failed: {reason}")]
    ListFailed { source_name: String, reason: String },

    #[error("Fetching message {id} failed: {reason}")]
    MessageFailed { id: String, reason: String },

    #[error("Fetching message {id} timed out after {timeout:?}")]
    Timeout { id: String, timeout: Duration },
}

/// Result type alias for the inbox core.
pub type Result<T> = std::result::Result<T, Error>;
