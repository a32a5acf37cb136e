use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub web_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".into(),
            web_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
        }
    }
}

impl SyncConfig {
    /// Never zero; a zero interval would spin.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Config {
    /// Read `path`, falling back to defaults when it does not exist, then
    /// apply the `PORT` environment variable.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            tracing::warn!("Config file {} not found, using defaults", path.display());
            Self::default()
        };
        config.apply_port(std::env::var("PORT").ok().as_deref());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Swap the port of `bind_address` for `port`, if it is a valid port.
    pub fn apply_port(&mut self, port: Option<&str>) {
        let Some(port) = port.and_then(|p| p.trim().parse::<u16>().ok()) else {
            return;
        };
        let host = match self.server.bind_address.rsplit_once(':') {
            Some((host, _)) => host,
            None => self.server.bind_address.as_str(),
        };
        self.server.bind_address = format!("{host}:{port}");
    }
}
