//! Document normalization.
//!
//! Converts raw submitted text or an extracted-PDF record into the
//! canonical (text, flat metadata) pair the store accepts. Derived metadata
//! is written first and caller-supplied metadata merged last, so caller
//! values win every key conflict.

use semdex_store::Metadata;

use crate::config::ServiceConfig;
use crate::error::{IngestError, Result};
use crate::pdf::PdfExtraction;

/// Number of characters kept in the `text_preview` metadata field.
const PREVIEW_CHARS: usize = 100;

/// A document submitted for ingestion.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Plain text as submitted by the caller.
    Text(String),
    /// Output of the external PDF extractor.
    Pdf(PdfExtraction),
}

/// Canonical text plus flattened metadata, ready for embedding and storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    /// The trimmed text that will be embedded and stored.
    pub text: String,

    /// Flat metadata: derived fields overlaid with caller metadata.
    pub metadata: Metadata,
}

/// Normalize a document source against the configured limits.
pub fn normalize(
    source: DocumentSource,
    caller_metadata: Metadata,
    config: &ServiceConfig,
) -> Result<NormalizedDocument> {
    let (text, mut metadata) = match source {
        DocumentSource::Text(text) => normalize_text(text, config)?,
        DocumentSource::Pdf(extraction) => normalize_pdf(extraction, config)?,
    };

    // Caller metadata merged last; caller values win ties.
    metadata.extend(caller_metadata);

    Ok(NormalizedDocument { text, metadata })
}

fn normalize_text(text: String, config: &ServiceConfig) -> Result<(String, Metadata)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(IngestError::EmptyInput);
    }
    if trimmed.len() > config.max_text_bytes {
        return Err(IngestError::TooLarge {
            size: trimmed.len(),
            max: config.max_text_bytes,
        });
    }

    let mut metadata = Metadata::new();
    metadata.insert("source_type".to_string(), "text".into());
    insert_text_fields(&mut metadata, trimmed);

    Ok((trimmed.to_string(), metadata))
}

fn normalize_pdf(extraction: PdfExtraction, config: &ServiceConfig) -> Result<(String, Metadata)> {
    if extraction.file_size_bytes > config.max_pdf_bytes {
        return Err(IngestError::TooLarge {
            size: extraction.file_size_bytes,
            max: config.max_pdf_bytes,
        });
    }
    if extraction.page_count == 0 {
        return Err(IngestError::UnsupportedFormat(
            "PDF contains no pages".to_string(),
        ));
    }

    let trimmed = extraction.text.trim();
    if trimmed.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let mut metadata = Metadata::new();
    metadata.insert("source_type".to_string(), "pdf".into());
    metadata.insert("filename".to_string(), extraction.filename.into());
    metadata.insert(
        "file_size_bytes".to_string(),
        extraction.file_size_bytes.into(),
    );
    metadata.insert("page_count".to_string(), extraction.page_count.into());
    metadata.insert("char_count".to_string(), extraction.char_count.into());
    metadata.insert("word_count".to_string(), extraction.word_count.into());
    insert_text_fields(&mut metadata, trimmed);

    // Flatten the header block; empty fields are dropped, not stored.
    let header = extraction.header;
    let header_fields = [
        ("pdf_title", header.title),
        ("pdf_author", header.author),
        ("pdf_subject", header.subject),
        ("pdf_creator", header.creator),
        ("pdf_producer", header.producer),
        ("pdf_creation_date", header.creation_date),
        ("pdf_modification_date", header.modification_date),
    ];
    for (key, value) in header_fields {
        if let Some(value) = value
            && !value.is_empty()
        {
            metadata.insert(key.to_string(), value.into());
        }
    }

    Ok((trimmed.to_string(), metadata))
}

fn insert_text_fields(metadata: &mut Metadata, text: &str) {
    let char_count = text.chars().count();
    let preview: String = if char_count > PREVIEW_CHARS {
        text.chars().take(PREVIEW_CHARS).chain("...".chars()).collect()
    } else {
        text.to_string()
    };

    metadata.insert("text_length".to_string(), char_count.into());
    metadata.insert("text_preview".to_string(), preview.into());
}
