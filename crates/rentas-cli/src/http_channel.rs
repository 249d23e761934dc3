//! Submission over HTTP to a running `rentas serve` (or compatible) endpoint.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use rentas_core::channel::SubmissionChannel;
use rentas_core::error::{FailureKind, SubmitError};
use rentas_core::models::record::ExtractionResult;
use rentas_core::models::wire::{DataResponse, ErrorResponse, ProcessRequest};

/// Posts `{"file_path": ...}` to the processing endpoint.
pub struct HttpChannel {
    client: Client,
    endpoint: String,
}

impl HttpChannel {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SubmissionChannel for HttpChannel {
    async fn submit(&self, path: &Path) -> Result<ExtractionResult, SubmitError> {
        let request = ProcessRequest {
            file_path: path.to_path_buf(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(format!("{}: {}", self.endpoint, e)))?;

        let status = response.status();
        debug!("{} answered {} for {}", self.endpoint, status, path.display());

        if status.is_success() {
            let body: DataResponse = response
                .json()
                .await
                .map_err(|e| SubmitError::Transport(format!("malformed success body: {}", e)))?;

            if !body.data.is_complete() {
                return Err(SubmitError::Transport(
                    "success body is missing catalog fields".to_string(),
                ));
            }
            return Ok(body.data);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };

        Err(SubmitError::Rejected {
            kind: FailureKind::from_status_code(status.as_u16()),
            message,
        })
    }
}
