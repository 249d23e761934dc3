//! Serve command - run the processing endpoint.

use std::sync::Arc;

use clap::Args;
use console::style;
use tokio::net::TcpListener;
use tracing::info;

use rentas_core::pipeline::IngestionPipeline;

use crate::server::{create_router, AppState};

use super::{load_config, open_store};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let store = open_store(&config)?;
    if let Some(database) = &config.storage.database {
        info!("Persisting results to {}", database.display());
    }

    let state = AppState {
        pipeline: Arc::new(IngestionPipeline::from_config(&config.pdf)),
        store,
    };
    let app = create_router(state);

    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    info!("Listening on {}", config.server.bind_addr());
    println!(
        "{} Serving {} (Ctrl+C to stop)",
        style("✓").green(),
        config.server.endpoint_url()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
