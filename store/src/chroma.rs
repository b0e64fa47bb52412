//! Chroma vector store client.
//!
//! Talks to Chroma's v1 REST API. The collection is resolved get-or-create
//! on first use and its id cached for subsequent calls; `delete_collection`
//! drops the cached id so the next operation re-resolves.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::document::{Document, Metadata, QueryMatch};
use crate::error::{Result, StoreError};
use crate::store::VectorStore;

/// Chroma REST implementation of [`VectorStore`].
pub struct ChromaStore {
    /// Base URL of the Chroma server.
    base_url: String,

    /// Name of the backing collection.
    collection_name: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Cached collection id.
    collection_id: RwLock<Option<String>>,
}

impl ChromaStore {
    /// Create a client for `collection_name` on the Chroma server at `base_url`.
    pub fn new(base_url: impl Into<String>, collection_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            collection_name: collection_name.into(),
            client: reqwest::Client::new(),
            collection_id: RwLock::new(None),
        }
    }

    /// The configured collection name.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Resolve the collection id, creating the collection if needed.
    async fn collection_id(&self) -> Result<String> {
        if let Some(id) = self.collection_id.read().await.clone() {
            return Ok(id);
        }

        let response = self
            .client
            .post(format!("{}/api/v1/collections", self.base_url))
            .json(&serde_json::json!({
                "name": self.collection_name,
                "get_or_create": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiRequest(format!(
                "collection lookup failed: {error_text}"
            )));
        }

        let collection: ChromaCollection = response.json().await?;
        debug!(
            "Resolved collection {} to id {}",
            self.collection_name, collection.id
        );

        *self.collection_id.write().await = Some(collection.id.clone());
        Ok(collection.id)
    }
}

#[async_trait]
impl VectorStore for ChromaStore {
    async fn upsert(&self, document: Document) -> Result<()> {
        let collection_id = self.collection_id().await?;

        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{collection_id}/upsert",
                self.base_url
            ))
            .json(&serde_json::json!({
                "ids": [document.id],
                "embeddings": [document.embedding],
                "documents": [document.text],
                "metadatas": [document.metadata],
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiRequest(format!("upsert failed: {error_text}")));
        }

        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        let collection_id = self.collection_id().await?;

        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{collection_id}/query",
                self.base_url
            ))
            .json(&serde_json::json!({
                "query_embeddings": [embedding],
                "n_results": top_k,
                "include": ["documents", "metadatas", "distances"],
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiRequest(format!("query failed: {error_text}")));
        }

        let result: ChromaQueryResponse = response.json().await?;

        // Chroma nests results one row per query embedding; we send one.
        let ids = result.ids.into_iter().next().unwrap_or_default();
        let documents = result
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        let metadatas = result
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let distances = result
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        if documents.len() != ids.len() || distances.len() != ids.len() {
            return Err(StoreError::InvalidResponse(
                "mismatched result columns".to_string(),
            ));
        }

        let matches = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| QueryMatch {
                id,
                text: documents[i].clone().unwrap_or_default(),
                metadata: metadatas.get(i).cloned().flatten().unwrap_or_default(),
                distance: distances[i],
            })
            .collect();

        Ok(matches)
    }

    async fn count(&self) -> Result<usize> {
        let collection_id = self.collection_id().await?;

        let response = self
            .client
            .get(format!(
                "{}/api/v1/collections/{collection_id}/count",
                self.base_url
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiRequest(format!("count failed: {error_text}")));
        }

        let count: usize = response.json().await?;
        Ok(count)
    }

    async fn create_collection(&self) -> Result<()> {
        self.collection_id().await?;
        Ok(())
    }

    async fn delete_collection(&self) -> Result<()> {
        let response = self
            .client
            .delete(format!(
                "{}/api/v1/collections/{}",
                self.base_url, self.collection_name
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiRequest(format!("delete failed: {error_text}")));
        }

        *self.collection_id.write().await = None;
        info!("Deleted collection {}", self.collection_name);

        Ok(())
    }
}

/// Chroma collection record.
#[derive(Debug, Deserialize)]
struct ChromaCollection {
    id: String,
}

/// Chroma query response format.
#[derive(Debug, Deserialize)]
struct ChromaQueryResponse {
    ids: Vec<Vec<String>>,
    documents: Option<Vec<Vec<Option<String>>>>,
    metadatas: Option<Vec<Vec<Option<Metadata>>>>,
    distances: Option<Vec<Vec<f32>>>,
}
