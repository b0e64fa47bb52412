//! Cache-fronted embedding generation.
//!
//! `EmbeddingGenerator` pins a provider to one model and one dimension,
//! fingerprints every input, and routes the provider call through the
//! cache so identical text is embedded at most once.

use tracing::debug;

use crate::Embedding;
use crate::cache::{CacheStats, EmbeddingCache};
use crate::error::{EmbeddingError, Result};
use crate::fingerprint::{Fingerprint, fingerprint};
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingTask};

/// Generates embeddings through a content-addressed cache.
///
/// All requests use the `RETRIEVAL_DOCUMENT` task hint, for documents and
/// queries alike, so a fingerprint names exactly one vector.
pub struct EmbeddingGenerator<P: EmbeddingProvider> {
    provider: P,
    cache: EmbeddingCache,
    model: String,
    dimension: usize,
}

impl<P: EmbeddingProvider> EmbeddingGenerator<P> {
    /// Create a generator for `provider` with an explicit model, dimension,
    /// and cache capacity.
    pub fn new(
        provider: P,
        model: impl Into<String>,
        dimension: usize,
        cache_max_entries: usize,
    ) -> Self {
        Self {
            provider,
            cache: EmbeddingCache::new(cache_max_entries),
            model: model.into(),
            dimension,
        }
    }

    /// Create a generator using the provider's default model and dimension.
    pub fn with_provider_defaults(provider: P, cache_max_entries: usize) -> Self {
        let model = provider.default_model().to_string();
        let dimension = provider.default_dimension();
        Self::new(provider, model, dimension, cache_max_entries)
    }

    /// Generate an embedding for `text`, resolving from cache when possible.
    ///
    /// A response whose vector is empty or whose length differs from the
    /// configured dimension is an error and is never cached; the next call
    /// for the same text retries the provider.
    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        let fp = fingerprint(text);
        debug!("Resolving embedding for {fp}");

        self.cache
            .get_or_compute(&fp, || async {
                let request = EmbeddingRequest::new(text)
                    .with_model(&self.model)
                    .with_dimensions(self.dimension)
                    .with_task(EmbeddingTask::RetrievalDocument);

                let response = self.provider.embed(request).await?;

                if response.embedding.is_empty() {
                    return Err(EmbeddingError::InvalidResponse(
                        "provider returned an empty vector".to_string(),
                    ));
                }
                if response.embedding.len() != self.dimension {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimension,
                        actual: response.embedding.len(),
                    });
                }

                Ok(response.embedding)
            })
            .await
    }

    /// Fingerprint of `text`, as used for cache keys and document ids.
    pub fn fingerprint_of(&self, text: &str) -> Fingerprint {
        fingerprint(text)
    }

    /// Whether the underlying provider is configured.
    pub fn provider_available(&self) -> bool {
        self.provider.is_available()
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The configured embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Current cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Evict all cached embeddings and reset the statistics.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
