//! Core library for property-registration settlement form ingestion.
//!
//! This crate provides:
//! - PDF text extraction, page by page, with an explicit page-failure policy
//! - Labelled field extraction for the 13 settlement-form fields
//! - The ingestion pipeline tying both to a file reference
//! - An upload directory watcher with run-scoped deduplication
//! - SQLite persistence of extraction results

pub mod channel;
pub mod error;
pub mod fields;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod store;
pub mod watcher;

pub use channel::{InProcessChannel, SubmissionChannel};
pub use error::{FailureKind, IngestError, PdfError, RentasError, Result, StoreError, SubmitError};
pub use fields::{FieldEngine, FieldSpec, ValuePolicy, CATALOG};
pub use models::config::RentasConfig;
pub use models::record::{ExtractionResult, FieldValue, NOT_FOUND};
pub use pdf::{PageFailurePolicy, PdfContent, PdfExtractor, PdfProcessor};
pub use pipeline::IngestionPipeline;
pub use store::{RecordStore, SharedStore, StoredRecord};
pub use watcher::{DirectoryWatcher, ProcessedSet, SkipReason, WatchOutcome};
