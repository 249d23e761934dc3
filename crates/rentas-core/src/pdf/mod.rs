//! PDF processing module.

mod extractor;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use extractor::{assemble_pages, PdfContent, PdfExtractor, PdfPage};

use serde::{Deserialize, Serialize};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Continuation decision when a single page fails to yield text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFailurePolicy {
    /// Log the failure and treat the page as empty.
    #[default]
    Skip,
    /// Fail the whole document with the page error.
    Abort,
}

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF, pages concatenated in order.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}
