//! # Ingest
//!
//! This crate sits between the HTTP surface and the two external systems:
//! it normalizes submitted documents, resolves their embeddings through the
//! content-addressed cache, and reads and writes the vector store.
//!
//! ## Features
//!
//! - **Normalization**: plain text and extracted-PDF input to canonical
//!   (text, flat metadata) pairs
//! - **Orchestration**: ingest, search, collection and cache management
//! - **PDF boundary**: the extractor contract and upload validation
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Document Service                       │
//! ├────────────────────────────────────────────────────────────┤
//! │  text / PDF ──► normalize ──► EmbeddingGenerator           │
//! │                                     │                      │
//! │                                     ▼                      │
//! │                               VectorStore                  │
//! │                          (ingest / search)                 │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod normalize;
pub mod pdf;
pub mod service;

pub use config::ServiceConfig;
pub use error::{IngestError, Result};
pub use normalize::{DocumentSource, NormalizedDocument, normalize};
pub use pdf::{PdfExtraction, PdfExtractor, PdfHeader, has_pdf_signature};
pub use service::{CollectionInfo, DocumentService, HealthStatus, SearchResult};

// Re-export from dependencies for convenience
pub use semdex_embeddings::{CacheStats, Embedding, EmbeddingProvider, Fingerprint};
pub use semdex_store::{Document, Metadata, MetadataValue, VectorStore};
