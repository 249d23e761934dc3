//! Watch command - submit PDFs as they land in the upload directory.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use tracing::{error, info};

use rentas_core::channel::{InProcessChannel, SubmissionChannel};
use rentas_core::models::config::WatchConfig;
use rentas_core::pipeline::IngestionPipeline;
use rentas_core::watcher::DirectoryWatcher;

use crate::http_channel::HttpChannel;

use super::{load_config, open_store};

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Upload directory (overrides config)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Processing endpoint URL; files are processed in-process when absent
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Also submit PDFs already in the directory
    #[arg(long)]
    process_existing: bool,

    /// Settle delay before submitting a new file, in milliseconds
    #[arg(long)]
    settle_delay_ms: Option<u64>,
}

pub async fn run(args: WatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(dir) = args.dir {
        config.watch.upload_dir = dir;
    }
    if let Some(endpoint) = args.endpoint {
        config.watch.endpoint = Some(endpoint);
    }
    if let Some(delay) = args.settle_delay_ms {
        config.watch.settle_delay_ms = delay;
    }
    config.watch.process_existing |= args.process_existing;

    match config.submission_endpoint() {
        Some(endpoint) => {
            let channel = HttpChannel::new(endpoint)?;
            println!(
                "{} Submitting to {}",
                style("ℹ").blue(),
                channel.endpoint()
            );
            watch(&config.watch, channel).await
        }
        None => {
            let pipeline = Arc::new(IngestionPipeline::from_config(&config.pdf));
            let mut channel = InProcessChannel::new(pipeline);
            if let Some(store) = open_store(&config)? {
                channel = channel.with_store(store);
            }
            watch(&config.watch, channel).await
        }
    }
}

async fn watch<C: SubmissionChannel>(config: &WatchConfig, channel: C) -> anyhow::Result<()> {
    let mut watcher = DirectoryWatcher::new(config, channel);
    let dir = watcher.prepare()?.to_path_buf();

    println!(
        "{} Watching {} (Ctrl+C to stop)",
        style("✓").green(),
        dir.display()
    );

    watcher
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Processed {} files this run", watcher.processed().len());
    println!(
        "{} Stopped. {} files processed this run.",
        style("✓").green(),
        watcher.processed().len()
    );

    Ok(())
}
