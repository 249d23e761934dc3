//! JSON bodies exchanged between the watcher and the processing endpoint.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::record::ExtractionResult;

/// Request body: a reference to a file on the shared filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub file_path: PathBuf,
}

/// Success body: `{"data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataResponse {
    pub data: ExtractionResult,
}

/// Failure body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
