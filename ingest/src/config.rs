//! Configuration for the document service.

use serde::{Deserialize, Serialize};

/// Configuration for the document service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name of the backing collection.
    pub collection_name: String,

    /// Embedding model to use.
    pub model: String,

    /// Embedding dimension.
    pub dimension: usize,

    /// Maximum number of cached embeddings.
    pub cache_max_entries: usize,

    /// Byte ceiling for submitted text.
    pub max_text_bytes: usize,

    /// Byte ceiling for uploaded PDFs.
    pub max_pdf_bytes: usize,
}

impl ServiceConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            collection_name: "documents".to_string(),
            model: "gemini-embedding-001".to_string(),
            dimension: 3072,
            cache_max_entries: 1000,
            max_text_bytes: 10_000,
            max_pdf_bytes: 50 * 1024 * 1024,
        }
    }

    /// Set the collection name.
    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    /// Set the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the cache capacity.
    pub fn with_cache_max_entries(mut self, max_entries: usize) -> Self {
        self.cache_max_entries = max_entries;
        self
    }

    /// Set the text byte ceiling.
    pub fn with_max_text_bytes(mut self, max: usize) -> Self {
        self.max_text_bytes = max;
        self
    }

    /// Set the PDF byte ceiling.
    pub fn with_max_pdf_bytes(mut self, max: usize) -> Self {
        self.max_pdf_bytes = max;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}
