//! Configuration structures for the ingestion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::pdf::PageFailurePolicy;

/// Main configuration for rentas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RentasConfig {
    /// Directory watcher configuration.
    pub watch: WatchConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Processing server configuration.
    pub server: ServerConfig,

    /// Record storage configuration.
    pub storage: StorageConfig,
}

/// Directory watcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Upload directory to observe (created if absent).
    pub upload_dir: PathBuf,

    /// Delay between detecting a file and submitting it, letting the
    /// producer finish writing.
    pub settle_delay_ms: u64,

    /// Submit PDFs already present in the directory at startup.
    pub process_existing: bool,

    /// Processing endpoint URL. In-process submission when unset.
    pub endpoint: Option<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            settle_delay_ms: 1000,
            process_existing: false,
            endpoint: None,
        }
    }
}

impl WatchConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// What to do when a single page fails to yield text.
    pub page_failure: PageFailurePolicy,
}

/// Processing server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL of the processing route served at this address.
    pub fn endpoint_url(&self) -> String {
        format!("http://{}/process-pdf", self.bind_addr())
    }
}

/// Record storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file. Results are not persisted when unset.
    pub database: Option<PathBuf>,
}

impl RentasConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Endpoint the watcher should submit to, if any.
    pub fn submission_endpoint(&self) -> Option<&str> {
        self.watch.endpoint.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RentasConfig =
            serde_json::from_str(r#"{"watch": {"upload_dir": "/srv/boletas"}}"#).unwrap();

        assert_eq!(config.watch.upload_dir, PathBuf::from("/srv/boletas"));
        assert_eq!(config.watch.settle_delay(), Duration::from_secs(1));
        assert_eq!(config.pdf.page_failure, PageFailurePolicy::Skip);
        assert_eq!(config.server.endpoint_url(), "http://127.0.0.1:5001/process-pdf");
        assert!(config.storage.database.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RentasConfig::default();
        config.watch.endpoint = Some("http://10.0.0.5:5001/process-pdf".to_string());
        config.save(&path).unwrap();

        let loaded = RentasConfig::from_file(&path).unwrap();
        assert_eq!(loaded.submission_endpoint(), Some("http://10.0.0.5:5001/process-pdf"));
    }
}
