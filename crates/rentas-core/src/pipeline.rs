//! Document ingestion: file reference in, extraction result out.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::IngestError;
use crate::fields::FieldEngine;
use crate::models::config::PdfConfig;
use crate::models::record::ExtractionResult;
use crate::pdf::{PageFailurePolicy, PdfExtractor, PdfProcessor};

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Reads a PDF, extracts its text and runs the field engine.
///
/// Apart from the file read, processing is a pure function of the bytes.
/// Calls block on I/O and PDF parsing; async callers should run them on a
/// blocking worker.
pub struct IngestionPipeline {
    engine: FieldEngine,
    page_failure: PageFailurePolicy,
}

impl IngestionPipeline {
    pub fn new() -> Self {
        Self {
            engine: FieldEngine::new(),
            page_failure: PageFailurePolicy::default(),
        }
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new().with_page_failure_policy(config.page_failure)
    }

    /// Set how per-page text failures are handled.
    pub fn with_page_failure_policy(mut self, policy: PageFailurePolicy) -> Self {
        self.page_failure = policy;
        self
    }

    /// Process the PDF at `reference`.
    pub fn process(&self, reference: &Path) -> Result<ExtractionResult> {
        validate_reference(reference)?;

        let data = std::fs::read(reference).map_err(|source| IngestError::NotFound {
            path: reference.to_path_buf(),
            source,
        })?;

        info!("Processing {} ({} bytes)", reference.display(), data.len());
        self.process_bytes(&data)
    }

    /// Process PDF content already in memory.
    pub fn process_bytes(&self, data: &[u8]) -> Result<ExtractionResult> {
        let start = Instant::now();

        let mut extractor = PdfExtractor::new().with_page_failure_policy(self.page_failure);
        extractor.load(data)?;
        let content = extractor.extract_all()?;

        let result = self.engine.parse(&content.text);

        debug!(
            "Processed {} pages ({} failed) into {}/{} fields in {}ms",
            content.pages.len(),
            content.failed_pages.len(),
            result.found_count(),
            result.len(),
            start.elapsed().as_millis()
        );

        Ok(result)
    }
}

impl Default for IngestionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that a reference names a PDF file, without touching its content.
///
/// A reference to a missing file passes; the read reports it as `NotFound`.
pub fn validate_reference(reference: &Path) -> Result<()> {
    if reference.as_os_str().is_empty() {
        return Err(IngestError::InvalidReference("empty file reference".to_string()));
    }

    if !has_pdf_extension(reference) {
        return Err(IngestError::InvalidReference(format!(
            "{} is not a PDF file",
            reference.display()
        )));
    }

    if reference.is_dir() {
        return Err(IngestError::InvalidReference(format!(
            "{} is a directory",
            reference.display()
        )));
    }

    Ok(())
}

/// Whether the file name ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::fields::CATALOG;
    use crate::models::record::NOT_FOUND;
    use crate::pdf::fixtures::{blank_pdf, text_pdf};
    use std::fs;

    fn settlement_pdf() -> Vec<u8> {
        text_pdf(&[
            &[
                "TOTAL A PAGAR: 1250000   ",
                "FECHA LIQ: 22.07.2024   ",
                "CLASE: COMPRAVENTA   ",
            ],
            &["NOMBRE LIQUIDADOR: ANA TORRES   "],
        ])
    }

    #[test]
    fn test_process_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boleta.pdf");
        fs::write(&path, settlement_pdf()).unwrap();

        let result = IngestionPipeline::new().process(&path).unwrap();

        assert!(result.is_complete());
        assert_eq!(result.value("TOTAL_PAGAR"), "1250000");
        assert_eq!(result.value("FECHA_LIQ"), "22.07.2024");
        assert_eq!(result.value("CLASE"), "COMPRAVENTA");
        assert_eq!(result.value("NOMBRE_LIQUIDADOR"), "ANA TORRES");
        assert_eq!(result.value("RADICADO"), NOT_FOUND);
        assert_eq!(result.len(), CATALOG.len());
    }

    #[test]
    fn test_same_bytes_same_result() {
        let pipeline = IngestionPipeline::new();
        let data = settlement_pdf();
        assert_eq!(
            pipeline.process_bytes(&data).unwrap(),
            pipeline.process_bytes(&data).unwrap()
        );
    }

    #[test]
    fn test_blank_document_is_no_extractable_text() {
        let err = IngestionPipeline::new().process_bytes(&blank_pdf()).unwrap_err();
        assert!(matches!(err, IngestError::NoExtractableText));
        assert_eq!(err.kind(), FailureKind::NoExtractableText);
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let err = IngestionPipeline::new().process_bytes(b"%PDF-broken").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Unreadable);
    }

    #[test]
    fn test_non_pdf_reference_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boleta.txt");
        fs::write(&path, "RADICADO N°: 1").unwrap();

        let err = IngestionPipeline::new().process(&path).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidReference);

        let err = IngestionPipeline::new().process(Path::new("")).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidReference);
    }

    #[test]
    fn test_directory_reference_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("lote.pdf");
        fs::create_dir(&sub).unwrap();

        let err = IngestionPipeline::new().process(&sub).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidReference);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = IngestionPipeline::new()
            .process(&dir.path().join("gone.pdf"))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotFound);
    }

    #[test]
    fn test_pdf_extension_ignores_case() {
        assert!(has_pdf_extension(Path::new("/uploads/BOLETA.PDF")));
        assert!(has_pdf_extension(Path::new("a.pdf")));
        assert!(!has_pdf_extension(Path::new("a.pdf.part")));
        assert!(!has_pdf_extension(Path::new("pdf")));
    }
}
