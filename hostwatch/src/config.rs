use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::error::ConfigError;

pub const CONFIG_PATH_ENV: &str = "HOSTWATCH_CONFIG";
pub const HOST_ENV: &str = "HOSTWATCH_HOST";
pub const PORT_ENV: &str = "HOSTWATCH_PORT";
pub const DEBUG_ENV: &str = "HOSTWATCH_DEBUG";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            debug: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Apply `HOSTWATCH_HOST` / `HOSTWATCH_PORT` / `HOSTWATCH_DEBUG` on top of the file values.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(HOST_ENV) {
            self.host = v.trim().parse().map_err(|_| ConfigError::InvalidEnv { key: HOST_ENV, value: v })?;
        }
        if let Some(v) = lookup(PORT_ENV) {
            self.port = v.trim().parse().map_err(|_| ConfigError::InvalidEnv { key: PORT_ENV, value: v })?;
        }
        if let Some(v) = lookup(DEBUG_ENV) {
            self.debug = parse_flag(&v).ok_or(ConfigError::InvalidEnv { key: DEBUG_ENV, value: v })?;
        }
        Ok(self)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read the YAML config file. Missing or empty file means defaults.
pub async fn load_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    if !path.exists() {
        info!("no {} found, using default config", path.display());
        return Ok(ServerConfig::default());
    }
    let txt = fs::read_to_string(path).await.map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    if txt.trim().is_empty() {
        warn!("{} is empty, using default config", path.display());
        return Ok(ServerConfig::default());
    }
    serde_yaml::from_str(&txt).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// File from `HOSTWATCH_CONFIG` (default `hostwatch.yaml`), then env overrides.
pub async fn load_config() -> Result<ServerConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "hostwatch.yaml".into());
    load_file(Path::new(&path))
        .await?
        .apply_overrides(|key| std::env::var(key).ok())
}
