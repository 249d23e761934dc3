//! Submission channels: how the watcher hands a file to the pipeline.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::error::SubmitError;
use crate::models::record::ExtractionResult;
use crate::pipeline::IngestionPipeline;
use crate::store::SharedStore;

/// Result type for submissions.
pub type Result<T> = std::result::Result<T, SubmitError>;

/// Capability to submit a file reference for extraction.
///
/// Success means the pipeline produced a complete result. Any error leaves
/// the file eligible for another attempt.
pub trait SubmissionChannel: Send + Sync {
    fn submit(&self, path: &Path) -> impl Future<Output = Result<ExtractionResult>> + Send;
}

impl<C: SubmissionChannel> SubmissionChannel for Arc<C> {
    fn submit(&self, path: &Path) -> impl Future<Output = Result<ExtractionResult>> + Send {
        (**self).submit(path)
    }
}

/// Runs the pipeline in this process on a blocking worker thread.
#[derive(Clone)]
pub struct InProcessChannel {
    pipeline: Arc<IngestionPipeline>,
    store: Option<SharedStore>,
}

impl InProcessChannel {
    pub fn new(pipeline: Arc<IngestionPipeline>) -> Self {
        Self {
            pipeline,
            store: None,
        }
    }

    /// Persist successful results to `store`.
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }
}

impl SubmissionChannel for InProcessChannel {
    async fn submit(&self, path: &Path) -> Result<ExtractionResult> {
        let pipeline = Arc::clone(&self.pipeline);
        let store = self.store.clone();
        let path: PathBuf = path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let result = pipeline.process(&path)?;
            if let Some(store) = store {
                persist(&store, &path, &result);
            }
            Ok::<_, SubmitError>(result)
        })
        .await
        .map_err(|e| SubmitError::Transport(format!("pipeline worker failed: {e}")))?
    }
}

/// Save a result, logging instead of failing: the extraction itself succeeded.
pub fn persist(store: &SharedStore, path: &Path, result: &ExtractionResult) {
    let guard = match store.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Err(e) = guard.save(path, result) {
        warn!("Failed to store result for {}: {}", path.display(), e);
    }
}
