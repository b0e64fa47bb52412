//! In-memory vector store.
//!
//! A brute-force backend for tests and small corpora. Distances are squared
//! Euclidean, matching Chroma's default metric, so results from both
//! backends are comparable.

use std::collections::HashMap;

use async_trait::async_trait;
use ordered_float::OrderedFloat;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::document::{Document, QueryMatch};
use crate::error::{Result, StoreError};
use crate::store::VectorStore;

/// Brute-force in-memory implementation of [`VectorStore`].
pub struct MemoryStore {
    /// Stored documents, keyed by id.
    documents: RwLock<HashMap<String, Document>>,

    /// Expected dimension of embeddings.
    dimension: usize,
}

impl MemoryStore {
    /// Create a new empty store expecting embeddings of `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            dimension,
        }
    }

    /// Check if an id exists in the store.
    pub async fn contains(&self, id: &str) -> bool {
        self.documents.read().await.contains_key(id)
    }

    /// Get a document by id.
    pub async fn get(&self, id: &str) -> Option<Document> {
        self.documents.read().await.get(id).cloned()
    }
}

fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, document: Document) -> Result<()> {
        if document.embedding.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: document.embedding.len(),
            });
        }

        let id = document.id.clone();
        self.documents.write().await.insert(id.clone(), document);
        debug!("Upserted document: {id}");

        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        if embedding.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let documents = self.documents.read().await;

        let mut scored: Vec<(OrderedFloat<f32>, &Document)> = documents
            .values()
            .map(|doc| {
                (
                    OrderedFloat(squared_euclidean(embedding, &doc.embedding)),
                    doc,
                )
            })
            .collect();

        // Sort by distance ascending
        scored.sort_by(|a, b| a.0.cmp(&b.0));

        let results: Vec<QueryMatch> = scored
            .into_iter()
            .take(top_k)
            .map(|(distance, doc)| QueryMatch {
                id: doc.id.clone(),
                text: doc.text.clone(),
                metadata: doc.metadata.clone(),
                distance: distance.0,
            })
            .collect();

        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.documents.read().await.len())
    }

    async fn create_collection(&self) -> Result<()> {
        Ok(())
    }

    async fn delete_collection(&self) -> Result<()> {
        self.documents.write().await.clear();
        info!("Cleared in-memory store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Metadata;
    use pretty_assertions::assert_eq;

    fn doc(id: &str, embedding: Vec<f32>) -> Document {
        Document {
            id: id.to_string(),
            text: format!("text for {id}"),
            metadata: Metadata::new(),
            embedding,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_count() {
        let store = MemoryStore::new(3);
        store.upsert(doc("a", vec![1.0, 0.0, 0.0])).await.unwrap();
        store.upsert(doc("b", vec![0.0, 1.0, 0.0])).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.contains("a").await);
    }

    #[tokio::test]
    async fn test_upsert_same_id_replaces() {
        let store = MemoryStore::new(3);
        store.upsert(doc("a", vec![1.0, 0.0, 0.0])).await.unwrap();
        store.upsert(doc("a", vec![0.0, 1.0, 0.0])).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get("a").await.unwrap();
        assert_eq!(stored.embedding, vec![0.0, 1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_query_ranks_by_distance() {
        let store = MemoryStore::new(3);
        store.upsert(doc("far", vec![0.0, 5.0, 0.0])).await.unwrap();
        store.upsert(doc("near", vec![1.0, 0.1, 0.0])).await.unwrap();
        store.upsert(doc("exact", vec![1.0, 0.0, 0.0])).await.unwrap();

        let results = store.query(&[1.0, 0.0, 0.0], 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "exact");
        assert_eq!(results[0].distance, 0.0);
        assert_eq!(results[1].id, "near");
        assert!(results[1].distance > results[0].distance);
    }

    #[tokio::test]
    async fn test_query_returns_at_most_available() {
        let store = MemoryStore::new(3);
        store.upsert(doc("only", vec![1.0, 0.0, 0.0])).await.unwrap();

        let results = store.query(&[1.0, 0.0, 0.0], 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_dimension_mismatch() {
        let store = MemoryStore::new(3);
        let result = store.upsert(doc("bad", vec![1.0, 0.0])).await;
        assert!(matches!(
            result,
            Err(StoreError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));

        let result = store.query(&[1.0], 1).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_collection_empties_store() {
        let store = MemoryStore::new(3);
        store.upsert(doc("a", vec![1.0, 0.0, 0.0])).await.unwrap();
        store.delete_collection().await.unwrap();
        store.create_collection().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
    }
}
