//! Upload directory watcher.
//!
//! Observes one directory, filters new entries down to PDF files and hands
//! each one to a [`SubmissionChannel`]. Successful submissions are remembered
//! for the rest of the run so re-delivered events do not process a file twice.

mod processed;

pub use processed::ProcessedSet;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::channel::SubmissionChannel;
use crate::error::{RentasError, SubmitError};
use crate::models::config::WatchConfig;
use crate::models::record::ExtractionResult;
use crate::pipeline::has_pdf_extension;

/// Why a detected path was not submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    NotPdf,
    AlreadyProcessed,
}

/// What happened to one detected path.
#[derive(Debug)]
pub enum WatchOutcome {
    Skipped(SkipReason),
    Submitted(ExtractionResult),
    Failed(SubmitError),
}

impl WatchOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Watches an upload directory and submits new PDFs through a channel.
pub struct DirectoryWatcher<C> {
    dir: PathBuf,
    channel: C,
    processed: ProcessedSet,
    settle_delay: Duration,
    process_existing: bool,
}

impl<C: SubmissionChannel> DirectoryWatcher<C> {
    pub fn new(config: &WatchConfig, channel: C) -> Self {
        Self {
            dir: config.upload_dir.clone(),
            channel,
            processed: ProcessedSet::new(),
            settle_delay: config.settle_delay(),
            process_existing: config.process_existing,
        }
    }

    /// Use an existing set, e.g. to inspect it after the run.
    pub fn with_processed_set(mut self, processed: ProcessedSet) -> Self {
        self.processed = processed;
        self
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if needed and resolve it to an absolute path.
    pub fn prepare(&mut self) -> Result<&Path, RentasError> {
        std::fs::create_dir_all(&self.dir)?;
        self.dir = self.dir.canonicalize()?;
        Ok(&self.dir)
    }

    /// Handle one newly detected path.
    pub async fn on_file_created(&self, path: &Path) -> WatchOutcome {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        if path.is_dir() {
            debug!("Skipping directory {}", path.display());
            return WatchOutcome::Skipped(SkipReason::Directory);
        }
        if !has_pdf_extension(&path) {
            debug!("Skipping non-PDF file {}", path.display());
            return WatchOutcome::Skipped(SkipReason::NotPdf);
        }
        if self.processed.contains(&path) {
            debug!("Skipping already processed {}", path.display());
            return WatchOutcome::Skipped(SkipReason::AlreadyProcessed);
        }

        info!("New PDF detected: {}", path.display());

        // Give the producer time to finish writing.
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        match self.channel.submit(&path).await {
            Ok(result) => {
                self.processed.insert(path.clone());
                info!(
                    "Processed {} ({}/{} fields found)",
                    path.display(),
                    result.found_count(),
                    result.len()
                );
                WatchOutcome::Submitted(result)
            }
            Err(e) => {
                if e.is_transport() {
                    error!("Could not submit {}: {}", path.display(), e);
                } else {
                    warn!("Processing failed for {}: {}", path.display(), e);
                }
                WatchOutcome::Failed(e)
            }
        }
    }

    /// Submit every PDF already in the directory, in file-name order.
    pub async fn scan_existing(&self) -> Result<usize, RentasError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_pdf_extension(p))
            .collect();
        paths.sort();

        info!("Found {} existing PDFs in {}", paths.len(), self.dir.display());

        let mut submitted = 0;
        for path in paths {
            if self.on_file_created(&path).await.is_submitted() {
                submitted += 1;
            }
        }
        Ok(submitted)
    }

    /// Observe the directory until `shutdown` resolves.
    ///
    /// Events are handled one at a time in arrival order.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), RentasError>
    where
        F: Future<Output = ()>,
    {
        self.prepare()?;

        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            // Receiver gone means the loop has stopped.
            let _ = tx.send(event);
        })?;
        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;

        info!("Watching {} for new PDFs", self.dir.display());

        if self.process_existing {
            self.scan_existing().await?;
        }

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping watcher on {}", self.dir.display());
                    break;
                }
                event = rx.recv() => match event {
                    Some(Ok(event)) if is_arrival(&event.kind) => {
                        for path in &event.paths {
                            self.on_file_created(path).await;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => error!("Watch error on {}: {}", self.dir.display(), e),
                    None => break,
                },
            }
        }

        Ok(())
    }
}

/// Creation, or a file renamed into the directory.
fn is_arrival(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To))
    )
}
