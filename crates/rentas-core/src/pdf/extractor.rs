//! PDF text extraction using lopdf.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PageFailurePolicy, PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    page_failure: PageFailurePolicy,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfContent {
    /// Page texts concatenated in page order, without boundary markers.
    pub text: String,
    /// Pages with their content.
    pub pages: Vec<PdfPage>,
    /// Pages whose text could not be extracted (1-indexed).
    pub failed_pages: Vec<u32>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page. Empty when extraction failed.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            page_failure: PageFailurePolicy::default(),
        }
    }

    /// Set the continuation decision for per-page failures.
    pub fn with_page_failure_policy(mut self, policy: PageFailurePolicy) -> Self {
        self.page_failure = policy;
        self
    }

    /// Extract every page and assemble the document text.
    pub fn extract_all(&self) -> Result<PdfContent> {
        let doc = self.document()?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(PdfError::NoPages);
        }

        let content = assemble_pages(
            page_numbers
                .into_iter()
                .map(|number| (number, self.extract_page_text(number))),
            self.page_failure,
        )?;

        debug!(
            "PDF text: {} pages, {} failed, {} chars",
            content.pages.len(),
            content.failed_pages.len(),
            content.text.len()
        );

        Ok(content)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenate per-page results in page order.
///
/// Under [`PageFailurePolicy::Skip`] a failed page contributes empty text and
/// is recorded in `failed_pages`; under [`PageFailurePolicy::Abort`] the first
/// failure is returned. Whitespace-only output is [`PdfError::NoExtractableText`].
pub fn assemble_pages<I>(pages: I, policy: PageFailurePolicy) -> Result<PdfContent>
where
    I: IntoIterator<Item = (u32, Result<String>)>,
{
    let mut content = PdfContent::default();

    for (number, page_text) in pages {
        let text = match page_text {
            Ok(text) => text,
            Err(err) => {
                warn!("Failed to read text from page {}: {}", number, err);
                if policy == PageFailurePolicy::Abort {
                    return Err(err);
                }
                content.failed_pages.push(number);
                String::new()
            }
        };

        content.text.push_str(&text);
        content.pages.push(PdfPage { number, text });
    }

    if content.text.trim().is_empty() {
        return Err(PdfError::NoExtractableText);
    }

    Ok(content)
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.extract_all().map(|content| content.text)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        doc.extract_text(&[page]).map_err(|e| PdfError::PageText {
            page,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{blank_pdf, text_pdf};

    fn page_error(page: u32) -> Result<String> {
        Err(PdfError::PageText {
            page,
            reason: "bad content stream".to_string(),
        })
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(matches!(extractor.extract_all(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_assemble_keeps_page_order() {
        let content = assemble_pages(
            vec![(1, Ok("first ".to_string())), (2, Ok("second".to_string()))],
            PageFailurePolicy::Skip,
        )
        .unwrap();

        assert_eq!(content.text, "first second");
        assert_eq!(content.pages.len(), 2);
        assert!(content.failed_pages.is_empty());
    }

    #[test]
    fn test_assemble_skips_failed_page() {
        let content = assemble_pages(
            vec![
                (1, Ok("RADICADO N°: 1   \n".to_string())),
                (2, page_error(2)),
                (3, Ok("CLASE: VENTA   \n".to_string())),
            ],
            PageFailurePolicy::Skip,
        )
        .unwrap();

        assert_eq!(content.failed_pages, vec![2]);
        assert_eq!(content.text, "RADICADO N°: 1   \nCLASE: VENTA   \n");
        assert!(content.pages[1].text.is_empty());
    }

    #[test]
    fn test_assemble_aborts_on_failed_page() {
        let result = assemble_pages(
            vec![(1, Ok("RADICADO N°: 1".to_string())), (2, page_error(2))],
            PageFailurePolicy::Abort,
        );

        assert!(matches!(result, Err(PdfError::PageText { page: 2, .. })));
    }

    #[test]
    fn test_assemble_whitespace_only_is_no_text() {
        let result = assemble_pages(
            vec![(1, Ok(" \n\t".to_string())), (2, page_error(2))],
            PageFailurePolicy::Skip,
        );

        assert!(matches!(result, Err(PdfError::NoExtractableText)));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let result = extractor.load(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_extract_text_from_generated_pdf() {
        let data = text_pdf(&[
            &["TOTAL A PAGAR: 1250000   "],
            &["CLASE: COMPRAVENTA   "],
        ]);

        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();
        assert_eq!(extractor.page_count(), 2);

        let content = extractor.extract_all().unwrap();
        assert!(content.failed_pages.is_empty());

        let total = content.text.find("TOTAL A PAGAR").unwrap();
        let clase = content.text.find("CLASE").unwrap();
        assert!(total < clase, "pages out of order: {:?}", content.text);
    }

    #[test]
    fn test_blank_pdf_has_no_text() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&blank_pdf()).unwrap();

        assert!(matches!(
            extractor.extract_text(),
            Err(PdfError::NoExtractableText)
        ));
    }
}
