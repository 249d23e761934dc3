//! HTTP processing endpoint.
//!
//! `POST /process-pdf` takes `{"file_path": ...}` and answers with the
//! `{"data": ...}` / `{"error": ...}` envelope; `GET /health` reports liveness.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use rentas_core::channel::persist;
use rentas_core::error::IngestError;
use rentas_core::models::wire::{DataResponse, ErrorResponse, ProcessRequest};
use rentas_core::pipeline::IngestionPipeline;
use rentas_core::store::SharedStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IngestionPipeline>,
    /// Successful results are saved here when set.
    pub store: Option<SharedStore>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Ingest(IngestError),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Ingest(e) => (
                StatusCode::from_u16(e.kind().status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                e.to_string(),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        AppError::Ingest(e)
    }
}

/// POST /process-pdf
async fn process_pdf(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<DataResponse>, AppError> {
    // Malformed bodies are bad references, answered in the error envelope.
    let Json(request) =
        payload.map_err(|rejection| IngestError::InvalidReference(rejection.body_text()))?;
    let path = request.file_path;
    info!("Processing request for {}", path.display());

    let pipeline = Arc::clone(&state.pipeline);
    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let result = pipeline.process(&path);
        match &result {
            Ok(data) => {
                if let Some(store) = &store {
                    persist(store, &path, data);
                }
            }
            Err(e) => warn!("Rejected {}: {}", path.display(), e),
        }
        result
    })
    .await
    .map_err(|e| AppError::Internal(format!("pipeline worker failed: {}", e)))?;

    Ok(Json(DataResponse { data: outcome? }))
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/process-pdf", post(process_pdf))
        .route("/health", get(health_check))
        .with_state(state)
}
