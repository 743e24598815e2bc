//! Error types for the dashboard backend

use thiserror::Error;

/// Workspace-wide error type
#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WatcherError {
    pub fn api(msg: impl Into<String>) -> Self {
        WatcherError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        WatcherError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        WatcherError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        WatcherError::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        WatcherError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        WatcherError::Internal(msg.into())
    }
}

/// Result type alias for dashboard operations
pub type WatcherResult<T> = Result<T, WatcherError>;
