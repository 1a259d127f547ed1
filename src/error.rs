//! Error types
//!
//! `StoreError` describes a single failed content-store query. `ApiError` is what callers
//! of the grouping and tree operations receive.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of one content-store query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed store reply: {0}")]
    Malformed(String),

    #[error("query cancelled")]
    Cancelled,
}

/// Call-level error returned by the public operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Listing failed for {}: {reason}", path.display())]
    ListingFailure { path: PathBuf, reason: String },

    #[error("Store query failed for {hash}: {source}")]
    StoreQueryFailure {
        hash: String,
        #[source]
        source: StoreError,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl ApiError {
    pub(crate) fn listing(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ApiError::ListingFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
