//! The vector store trait.

use async_trait::async_trait;

use crate::document::{Document, QueryMatch};
use crate::error::Result;

/// Trait for vector store backends.
///
/// Implementations hold (embedding, text, metadata) records keyed by id and
/// answer nearest-neighbor queries over the embeddings. Upserting an
/// existing id replaces the record.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace a document.
    async fn upsert(&self, document: Document) -> Result<()>;

    /// Return up to `top_k` nearest neighbors of `embedding`, closest first.
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<QueryMatch>>;

    /// Number of documents currently stored.
    async fn count(&self) -> Result<usize>;

    /// Create the backing collection if it does not exist.
    async fn create_collection(&self) -> Result<()>;

    /// Delete the backing collection and everything in it.
    async fn delete_collection(&self) -> Result<()>;
}
