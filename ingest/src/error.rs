//! Error types for ingestion and search.

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur during ingestion and search.
///
/// The first four variants are caller errors and surface immediately;
/// provider and store failures propagate from the crates below without
/// retry.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Input text or query is empty after trimming.
    #[error("input text is empty")]
    EmptyInput,

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Upload is not a usable PDF.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Input exceeds a configured byte ceiling.
    #[error("input too large: {size} bytes exceeds limit of {max}")]
    TooLarge { size: usize, max: usize },

    /// Embedding provider failure.
    #[error("embedding error: {0}")]
    Embedding(#[from] semdex_embeddings::EmbeddingError),

    /// Vector store failure.
    #[error("store error: {0}")]
    Store(#[from] semdex_store::StoreError),
}
