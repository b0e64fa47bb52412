//! Document service orchestration.
//!
//! `DocumentService` coordinates normalization, cached embedding
//! generation, and the vector store. It is stateless per call; the only
//! shared mutable state lives inside the embedding cache.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use semdex_embeddings::{
    CacheStats, Embedding, EmbeddingGenerator, EmbeddingProvider, Fingerprint,
};
use semdex_store::{Document, Metadata, QueryMatch, VectorStore};

use crate::config::ServiceConfig;
use crate::error::{IngestError, Result};
use crate::normalize::{DocumentSource, normalize};
use crate::pdf::{PdfExtraction, PdfExtractor, has_pdf_signature};

/// A search hit shaped for callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Id of the matched document.
    pub id: String,

    /// Text of the matched document.
    pub text: String,

    /// Metadata of the matched document.
    pub metadata: Metadata,

    /// Distance reported by the store.
    pub distance: f32,

    /// `1 / (1 + distance)`: in (0, 1], decreasing with distance. An
    /// ordering aid, not a probability.
    pub similarity_score: f32,
}

impl SearchResult {
    fn from_match(m: QueryMatch) -> Self {
        Self {
            similarity_score: 1.0 / (1.0 + m.distance),
            id: m.id,
            text: m.text,
            metadata: m.metadata,
            distance: m.distance,
        }
    }
}

/// Collection-level information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Collection name.
    pub collection_name: String,

    /// Number of stored documents.
    pub document_count: usize,

    /// Configured embedding dimension.
    pub embedding_dimension: usize,

    /// Configured embedding model.
    pub model: String,
}

/// Reachability of the external collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Whether the embedding provider answered a test embedding.
    pub provider_reachable: bool,

    /// Whether the vector store answered a count.
    pub store_reachable: bool,
}

/// Orchestrates ingestion and search over an embedding provider and a
/// vector store.
pub struct DocumentService<P: EmbeddingProvider, S: VectorStore> {
    config: ServiceConfig,
    generator: EmbeddingGenerator<P>,
    store: S,
}

impl<P: EmbeddingProvider, S: VectorStore> DocumentService<P, S> {
    /// Create a service from a configuration, a provider, and a store.
    pub fn new(config: ServiceConfig, provider: P, store: S) -> Self {
        let generator = EmbeddingGenerator::new(
            provider,
            config.model.clone(),
            config.dimension,
            config.cache_max_entries,
        );
        Self {
            config,
            generator,
            store,
        }
    }

    /// Generate an embedding for `text` without storing anything.
    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IngestError::EmptyInput);
        }
        if trimmed.len() > self.config.max_text_bytes {
            return Err(IngestError::TooLarge {
                size: trimmed.len(),
                max: self.config.max_text_bytes,
            });
        }

        Ok(self.generator.embed(trimmed).await?)
    }

    /// Ingest a plain-text document. Returns its content-derived id.
    pub async fn ingest_text(&self, text: &str, metadata: Metadata) -> Result<Fingerprint> {
        let normalized = normalize(
            DocumentSource::Text(text.to_string()),
            metadata,
            &self.config,
        )?;
        self.ingest_normalized(normalized.text, normalized.metadata)
            .await
    }

    /// Ingest an already-extracted PDF document. Returns its content-derived id.
    pub async fn ingest_pdf(
        &self,
        extraction: PdfExtraction,
        metadata: Metadata,
    ) -> Result<Fingerprint> {
        let normalized = normalize(DocumentSource::Pdf(extraction), metadata, &self.config)?;
        self.ingest_normalized(normalized.text, normalized.metadata)
            .await
    }

    /// Validate, extract, and ingest an uploaded PDF.
    pub async fn ingest_pdf_bytes(
        &self,
        bytes: &[u8],
        filename: &str,
        metadata: Metadata,
        extractor: &dyn PdfExtractor,
    ) -> Result<Fingerprint> {
        if bytes.len() > self.config.max_pdf_bytes {
            return Err(IngestError::TooLarge {
                size: bytes.len(),
                max: self.config.max_pdf_bytes,
            });
        }
        if !has_pdf_signature(bytes) {
            return Err(IngestError::UnsupportedFormat(
                "not a PDF file".to_string(),
            ));
        }
        if !extractor.validate(bytes).await {
            return Err(IngestError::UnsupportedFormat(
                "corrupt or empty PDF".to_string(),
            ));
        }

        let extraction = extractor.extract(bytes, filename).await?;
        self.ingest_pdf(extraction, metadata).await
    }

    /// Embed canonical text and upsert the document. The embedding comes
    /// first, so a provider failure never leaves a partial write.
    async fn ingest_normalized(&self, text: String, metadata: Metadata) -> Result<Fingerprint> {
        let fingerprint = self.generator.fingerprint_of(&text);
        let embedding = self.generator.embed(&text).await?;

        self.store
            .upsert(Document {
                id: fingerprint.to_string(),
                text,
                metadata,
                embedding,
            })
            .await?;

        info!("Ingested document {fingerprint}");
        Ok(fingerprint)
    }

    /// Search for the `k` nearest documents to `query`.
    ///
    /// Asks the store for at most `min(k, document_count)` neighbors; an
    /// empty store yields an empty result without a store query.
    pub async fn search(&self, query: &str, k: i64) -> Result<Vec<SearchResult>> {
        if k <= 0 {
            return Err(IngestError::InvalidArgument(format!(
                "k must be positive, got {k}"
            )));
        }
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(IngestError::EmptyInput);
        }

        let count = self.store.count().await?;
        if count == 0 {
            debug!("Search against empty collection");
            return Ok(Vec::new());
        }

        let embedding = self.generator.embed(trimmed).await?;
        let top_k = (k as usize).min(count);
        let matches = self.store.query(&embedding, top_k).await?;

        debug!("Search returned {} results", matches.len());
        Ok(matches.into_iter().map(SearchResult::from_match).collect())
    }

    /// Collection name, document count, and embedding configuration.
    pub async fn collection_info(&self) -> Result<CollectionInfo> {
        let document_count = self.store.count().await?;
        Ok(CollectionInfo {
            collection_name: self.config.collection_name.clone(),
            document_count,
            embedding_dimension: self.generator.dimension(),
            model: self.generator.model().to_string(),
        })
    }

    /// Delete and recreate the backing collection.
    ///
    /// The embedding cache is left intact: entries key on text content, not
    /// on store membership, so they stay valid across a reset.
    pub async fn reset_collection(&self) -> Result<()> {
        self.store.delete_collection().await?;
        self.store.create_collection().await?;
        info!("Reset collection {}", self.config.collection_name);
        Ok(())
    }

    /// Current embedding cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.generator.cache_stats().await
    }

    /// Evict all cached embeddings and reset the statistics.
    pub async fn clear_cache(&self) {
        self.generator.clear_cache().await;
    }

    /// Probe both external collaborators.
    ///
    /// The provider is exercised through the normal embedding path (and so
    /// through the cache); the store through `count`.
    pub async fn health_check(&self) -> HealthStatus {
        let provider_reachable = match self.generator.embed("test connection").await {
            Ok(_) => true,
            Err(e) => {
                warn!("Provider health probe failed: {e}");
                false
            }
        };
        let store_reachable = match self.store.count().await {
            Ok(_) => true,
            Err(e) => {
                warn!("Store health probe failed: {e}");
                false
            }
        };

        HealthStatus {
            provider_reachable,
            store_reachable,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use semdex_embeddings::{EmbeddingError, EmbeddingRequest, EmbeddingResponse};
    use semdex_store::MemoryStore;

    use super::*;

    const DIMENSION: usize = 4;

    /// Deterministic provider: the vector is a function of the text bytes.
    struct StubProvider;

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn default_model(&self) -> &str {
            "stub-model"
        }

        fn default_dimension(&self) -> usize {
            DIMENSION
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> semdex_embeddings::Result<EmbeddingResponse> {
            let seed = request.text.bytes().map(f32::from).sum::<f32>();
            let embedding: Embedding = (0..DIMENSION).map(|i| seed + i as f32).collect();
            Ok(EmbeddingResponse {
                dimension: embedding.len(),
                embedding,
                model: "stub-model".to_string(),
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    /// Provider that always fails, for no-partial-write tests.
    struct DownProvider;

    #[async_trait]
    impl EmbeddingProvider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        fn default_model(&self) -> &str {
            "down-model"
        }

        fn default_dimension(&self) -> usize {
            DIMENSION
        }

        async fn embed(
            &self,
            _request: EmbeddingRequest,
        ) -> semdex_embeddings::Result<EmbeddingResponse> {
            Err(EmbeddingError::ApiRequest("provider down".to_string()))
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    fn service() -> DocumentService<StubProvider, MemoryStore> {
        let config = ServiceConfig::default().with_dimension(DIMENSION);
        DocumentService::new(config, StubProvider, MemoryStore::new(DIMENSION))
    }

    #[tokio::test]
    async fn test_embed_rejects_empty_and_oversized() {
        let svc = service();
        assert!(matches!(
            svc.embed("   ").await.unwrap_err(),
            IngestError::EmptyInput
        ));

        let config = ServiceConfig::default()
            .with_dimension(DIMENSION)
            .with_max_text_bytes(4);
        let svc = DocumentService::new(config, StubProvider, MemoryStore::new(DIMENSION));
        assert!(matches!(
            svc.embed("too long").await.unwrap_err(),
            IngestError::TooLarge { .. }
        ));
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent_by_content() {
        let svc = service();
        let mut metadata = Metadata::new();
        metadata.insert("category".to_string(), "story".into());

        let first = svc.ingest_text("same text", metadata.clone()).await.unwrap();
        let second = svc.ingest_text("same text", metadata).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(svc.store.count().await.unwrap(), 1);

        // The second ingest resolved its embedding from cache.
        let stats = svc.cache_stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_failed_embedding_writes_nothing() {
        let config = ServiceConfig::default().with_dimension(DIMENSION);
        let svc = DocumentService::new(config, DownProvider, MemoryStore::new(DIMENSION));

        let err = svc
            .ingest_text("doomed document", Metadata::new())
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Embedding(_)));
        assert_eq!(svc.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_validation() {
        let svc = service();

        assert!(matches!(
            svc.search("", 5).await.unwrap_err(),
            IngestError::EmptyInput
        ));
        assert!(matches!(
            svc.search("x", -1).await.unwrap_err(),
            IngestError::InvalidArgument(_)
        ));
        assert!(matches!(
            svc.search("x", 0).await.unwrap_err(),
            IngestError::InvalidArgument(_)
        ));
    }

    #[tokio::test]
    async fn test_search_empty_store_returns_empty() {
        let svc = service();
        let results = svc.search("anything", 5).await.unwrap();
        assert!(results.is_empty());

        // No embedding was computed for the query.
        assert_eq!(svc.cache_stats().await.misses, 0);
    }

    #[tokio::test]
    async fn test_search_caps_k_at_document_count() {
        let svc = service();
        svc.ingest_text("first document", Metadata::new()).await.unwrap();
        svc.ingest_text("second document", Metadata::new()).await.unwrap();

        let results = svc.search("first document", 10).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_search_scores_and_ranks() {
        let svc = service();
        svc.ingest_text("aaaa", Metadata::new()).await.unwrap();
        svc.ingest_text("zzzz", Metadata::new()).await.unwrap();

        let results = svc.search("aaaa", 2).await.unwrap();
        assert_eq!(results.len(), 2);

        // Exact content match ranks first with distance zero.
        assert_eq!(results[0].distance, 0.0);
        assert_eq!(results[0].similarity_score, 1.0);
        assert_eq!(results[0].text, "aaaa");

        // Scores decrease as distance grows and stay within (0, 1].
        assert!(results[1].distance > 0.0);
        assert!(results[1].similarity_score < results[0].similarity_score);
        assert!(results[1].similarity_score > 0.0);
    }

    #[tokio::test]
    async fn test_collection_info() {
        let svc = service();
        svc.ingest_text("a document", Metadata::new()).await.unwrap();

        let info = svc.collection_info().await.unwrap();
        assert_eq!(info.collection_name, "documents");
        assert_eq!(info.document_count, 1);
        assert_eq!(info.embedding_dimension, DIMENSION);
        assert_eq!(info.model, "gemini-embedding-001");
    }

    #[tokio::test]
    async fn test_reset_collection_keeps_cache() {
        let svc = service();
        svc.ingest_text("kept in cache", Metadata::new()).await.unwrap();
        assert_eq!(svc.store.count().await.unwrap(), 1);

        svc.reset_collection().await.unwrap();

        let info = svc.collection_info().await.unwrap();
        assert_eq!(info.document_count, 0);

        // Cache entries and counters survive the reset.
        let stats = svc.cache_stats().await;
        assert_eq!(stats.size, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_health_check() {
        let svc = service();
        let health = svc.health_check().await;
        assert!(health.provider_reachable);
        assert!(health.store_reachable);

        let config = ServiceConfig::default().with_dimension(DIMENSION);
        let down = DocumentService::new(config, DownProvider, MemoryStore::new(DIMENSION));
        let health = down.health_check().await;
        assert!(!health.provider_reachable);
        assert!(health.store_reachable);
    }

    #[tokio::test]
    async fn test_pdf_bytes_pipeline_rejections() {
        struct NoopExtractor;

        #[async_trait]
        impl PdfExtractor for NoopExtractor {
            async fn extract(
                &self,
                _bytes: &[u8],
                filename: &str,
            ) -> crate::error::Result<PdfExtraction> {
                Ok(PdfExtraction::new("extracted text", filename))
            }

            async fn validate(&self, bytes: &[u8]) -> bool {
                bytes.len() > 8
            }
        }

        let svc = service();
        let extractor = NoopExtractor;

        let err = svc
            .ingest_pdf_bytes(b"not a pdf", "x.pdf", Metadata::new(), &extractor)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));

        let err = svc
            .ingest_pdf_bytes(b"%PDF-1.7", "x.pdf", Metadata::new(), &extractor)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));

        let id = svc
            .ingest_pdf_bytes(b"%PDF-1.7 body", "x.pdf", Metadata::new(), &extractor)
            .await
            .unwrap();
        assert_eq!(id, svc.generator.fingerprint_of("extracted text"));
    }
}
