//! Bounded LRU cache for computed embeddings.
//!
//! Embedding calls are the dominant cost in the pipeline, and the same text
//! shows up repeatedly (duplicate submissions, retried requests, queries
//! that match earlier ingests). Keying by content fingerprint keeps the
//! cache memory-bounded and lets identical text resolve without re-paying
//! the provider.

use std::future::Future;
use std::num::NonZeroUsize;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::Embedding;
use crate::error::Result;
use crate::fingerprint::Fingerprint;

struct CacheState {
    entries: LruCache<Fingerprint, Embedding>,
    hits: u64,
    misses: u64,
}

/// Cache for embeddings to avoid redundant provider calls.
///
/// Lookup, counter updates, insertion, and eviction each happen inside one
/// critical section, so statistics stay consistent under concurrent use.
/// The compute future for a miss runs with the lock released; two
/// concurrent misses for the same fingerprint may both invoke it.
pub struct EmbeddingCache {
    state: Mutex<CacheState>,
    max_entries: usize,
}

impl EmbeddingCache {
    /// Create a new cache holding at most `max_entries` embeddings.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
            max_entries: capacity.get(),
        }
    }

    /// Return the cached embedding for `fingerprint`, or compute and cache it.
    ///
    /// A hit refreshes the entry's recency. A miss runs `compute`; on
    /// success the result is stored, evicting the least-recently-used entry
    /// if the cache is full. A failed compute is counted as a miss but
    /// caches nothing, so the next call for the same fingerprint retries.
    pub async fn get_or_compute<F, Fut>(&self, fingerprint: &Fingerprint, compute: F) -> Result<Embedding>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Embedding>>,
    {
        {
            let mut state = self.state.lock().await;
            if let Some(embedding) = state.entries.get(fingerprint) {
                let embedding = embedding.clone();
                state.hits += 1;
                debug!("cache hit for {fingerprint}");
                return Ok(embedding);
            }
            state.misses += 1;
        }

        // Lock released while the provider call is in flight.
        let embedding = compute().await?;

        let mut state = self.state.lock().await;
        state.entries.put(fingerprint.clone(), embedding.clone());
        debug!("cached embedding for {fingerprint}");

        Ok(embedding)
    }

    /// Remove all entries and reset hit/miss counters to zero.
    ///
    /// A miss whose compute is still in flight when `clear` runs will
    /// insert its result afterwards; that stale resurrection is an accepted
    /// race.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
        info!("cleared embedding cache");
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let lookups = state.hits + state.misses;
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            size: state.entries.len(),
            max_size: self.max_entries,
            hit_rate: if lookups > 0 {
                state.hits as f64 / lookups as f64
            } else {
                0.0
            },
        }
    }
}

/// Statistics about the embedding cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits since the last clear.
    pub hits: u64,

    /// Number of cache misses since the last clear.
    pub misses: u64,

    /// Number of entries currently cached.
    pub size: usize,

    /// Maximum cache size.
    pub max_size: usize,

    /// hits / (hits + misses), or 0 when no lookups have happened.
    pub hit_rate: f64,
}
