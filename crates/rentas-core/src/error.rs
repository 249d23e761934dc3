//! Error types for the rentas-core library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the rentas library.
#[derive(Error, Debug)]
pub enum RentasError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Document ingestion error.
    #[error("ingestion error: {0}")]
    Ingest(#[from] IngestError),

    /// Submission channel error.
    #[error("submission error: {0}")]
    Submit(#[from] SubmitError),

    /// Record store error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Filesystem watcher error.
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from a single page.
    #[error("failed to extract text from page {page}: {reason}")]
    PageText { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Every page yielded empty or whitespace-only text.
    #[error("no extractable text in PDF")]
    NoExtractableText,
}

/// Document-level failures of the ingestion pipeline.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The file reference is malformed or does not name a PDF.
    #[error("invalid file reference: {0}")]
    InvalidReference(String),

    /// The referenced file could not be read.
    #[error("file not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF opened but no page produced usable text.
    #[error("no extractable text in document")]
    NoExtractableText,

    /// The PDF could not be opened or a page failed under the abort policy.
    #[error("unreadable PDF: {0}")]
    Unreadable(#[source] PdfError),
}

impl IngestError {
    /// Classification of this failure for callers and transports.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidReference(_) => FailureKind::InvalidReference,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::NoExtractableText => FailureKind::NoExtractableText,
            Self::Unreadable(_) => FailureKind::Unreadable,
        }
    }
}

impl From<PdfError> for IngestError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::NoExtractableText => Self::NoExtractableText,
            other => Self::Unreadable(other),
        }
    }
}

/// Failure classification shared by the pipeline and its transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidReference,
    NotFound,
    NoExtractableText,
    Unreadable,
}

impl FailureKind {
    /// HTTP status used when the failure crosses a transport.
    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidReference => 400,
            Self::NotFound => 404,
            Self::NoExtractableText => 422,
            Self::Unreadable => 500,
        }
    }

    /// Inverse of [`FailureKind::status_code`].
    pub fn from_status_code(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::InvalidReference),
            404 => Some(Self::NotFound),
            422 => Some(Self::NoExtractableText),
            500 => Some(Self::Unreadable),
            _ => None,
        }
    }
}

/// Errors raised while handing a file reference to the pipeline.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The channel could not reach the pipeline.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The pipeline was reached and refused the document.
    #[error("rejected by pipeline: {message}")]
    Rejected {
        kind: Option<FailureKind>,
        message: String,
    },
}

impl SubmitError {
    /// Whether the failure happened before the pipeline saw the document.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<IngestError> for SubmitError {
    fn from(err: IngestError) -> Self {
        Self::Rejected {
            kind: Some(err.kind()),
            message: err.to_string(),
        }
    }
}

/// Errors related to record persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored fields could not be (de)serialized.
    #[error("invalid stored fields: {0}")]
    Fields(#[from] serde_json::Error),

    /// Stored timestamp is malformed.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Result type for the rentas library.
pub type Result<T> = std::result::Result<T, RentasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_round_trip() {
        for kind in [
            FailureKind::InvalidReference,
            FailureKind::NotFound,
            FailureKind::NoExtractableText,
            FailureKind::Unreadable,
        ] {
            assert_eq!(FailureKind::from_status_code(kind.status_code()), Some(kind));
        }
        assert_eq!(FailureKind::from_status_code(502), None);
    }

    #[test]
    fn test_no_extractable_text_is_not_wrapped() {
        let err: IngestError = PdfError::NoExtractableText.into();
        assert!(matches!(err, IngestError::NoExtractableText));

        let err: IngestError = PdfError::NoPages.into();
        assert_eq!(err.kind(), FailureKind::Unreadable);
    }

    #[test]
    fn test_ingest_error_becomes_rejection() {
        let err = SubmitError::from(IngestError::InvalidReference("notes.txt".to_string()));
        assert!(!err.is_transport());
        match err {
            SubmitError::Rejected { kind, message } => {
                assert_eq!(kind, Some(FailureKind::InvalidReference));
                assert!(message.contains("notes.txt"));
            }
            SubmitError::Transport(_) => panic!("expected rejection"),
        }
    }
}
