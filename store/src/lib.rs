//! # Store
//!
//! This crate is the vector-store boundary for semdex: the document and
//! metadata model the rest of the system writes through, the [`VectorStore`]
//! trait, and two backends.
//!
//! ## Features
//!
//! - **Documents**: (id, text, flat metadata, embedding) records
//! - **MemoryStore**: brute-force in-memory backend for tests and small corpora
//! - **ChromaStore**: client for Chroma's REST API
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Store System                         │
//! ├────────────────────────────────────────────────────────────┤
//! │  Document ──► VectorStore ──► ranked QueryMatch list       │
//! │                   │                                        │
//! │          ┌────────┴────────┐                               │
//! │          ▼                 ▼                               │
//! │     MemoryStore       ChromaStore                          │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod chroma;
pub mod document;
pub mod error;
pub mod memory;
pub mod store;

pub use chroma::ChromaStore;
pub use document::{Document, Metadata, MetadataValue, QueryMatch};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::VectorStore;
