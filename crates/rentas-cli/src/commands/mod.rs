//! Subcommands.

pub mod batch;
pub mod config;
pub mod process;
pub mod records;
pub mod serve;
pub mod watch;

use std::path::{Path, PathBuf};

use tracing::debug;

use rentas_core::models::config::RentasConfig;
use rentas_core::store::{RecordStore, SharedStore};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rentas")
        .join("config.json")
}

/// Load the `--config` file, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RentasConfig> {
    if let Some(path) = config_path {
        return Ok(RentasConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(RentasConfig::from_file(&default_path)?)
    } else {
        Ok(RentasConfig::default())
    }
}

/// Open the configured record store, if any.
pub fn open_store(config: &RentasConfig) -> anyhow::Result<Option<SharedStore>> {
    match &config.storage.database {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Ok(Some(RecordStore::open(path)?.into_shared()))
        }
        None => Ok(None),
    }
}
