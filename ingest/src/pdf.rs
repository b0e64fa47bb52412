//! The PDF-extractor boundary.
//!
//! Text extraction itself is an external collaborator; this module carries
//! its interface and output contract. `has_pdf_signature` is the cheap
//! first-line check run before bytes are handed to an extractor.

use async_trait::async_trait;

use crate::error::Result;

/// Header fields read from a PDF's document information dictionary.
///
/// Fields are optional; extractors report absent or blank entries as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfHeader {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
}

/// Output contract of a PDF extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfExtraction {
    /// Full extracted text.
    pub text: String,

    /// Original filename.
    pub filename: String,

    /// Size of the uploaded file in bytes.
    pub file_size_bytes: usize,

    /// Number of pages.
    pub page_count: usize,

    /// Character count of the extracted text.
    pub char_count: usize,

    /// Word count of the extracted text.
    pub word_count: usize,

    /// Document header fields.
    pub header: PdfHeader,
}

impl PdfExtraction {
    /// Create an extraction record, deriving character and word counts from
    /// the text.
    pub fn new(text: impl Into<String>, filename: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            text,
            filename: filename.into(),
            file_size_bytes: 0,
            page_count: 1,
            header: PdfHeader::default(),
        }
    }

    /// Set the file size in bytes.
    pub fn with_file_size_bytes(mut self, size: usize) -> Self {
        self.file_size_bytes = size;
        self
    }

    /// Set the page count.
    pub fn with_page_count(mut self, pages: usize) -> Self {
        self.page_count = pages;
        self
    }

    /// Set the header fields.
    pub fn with_header(mut self, header: PdfHeader) -> Self {
        self.header = header;
        self
    }
}

/// Trait for PDF text extractors.
#[async_trait]
pub trait PdfExtractor: Send + Sync {
    /// Extract text and metadata from PDF bytes.
    async fn extract(&self, bytes: &[u8], filename: &str) -> Result<PdfExtraction>;

    /// Check that the bytes are a readable PDF with at least one page.
    async fn validate(&self, bytes: &[u8]) -> bool;
}

/// Check for the `%PDF-` magic number at the start of the file.
pub fn has_pdf_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}
