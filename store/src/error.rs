//! Error types for the vector store boundary.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur at the vector store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Store API rejected the request.
    #[error("store request failed: {0}")]
    ApiRequest(String),

    /// Malformed response from the store.
    #[error("invalid store response: {0}")]
    InvalidResponse(String),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
