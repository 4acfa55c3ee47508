//! Daemon configuration
//!
//! Settings come from an optional TOML file, overridden by command-line
//! flags and `PSACC_*` environment variables:
//!
//! ```toml
//! api_url = "http://192.168.1.20:5000"
//! vin = "VR3UHZKXZLT123456"   # omit to discover every vehicle
//! update_interval = 5         # minutes
//!
//! [server]
//! host = "0.0.0.0"
//! port = 18090
//! ```

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use psacc_coordinator::{
    update_interval_from_minutes, CoordinatorMode, DEFAULT_UPDATE_INTERVAL_MINUTES,
    MAX_UPDATE_INTERVAL_MINUTES, MIN_UPDATE_INTERVAL_MINUTES,
};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 18090;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Invalid listen host {0}")]
    ListenAddr(String),
}

/// Settings as written in the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub vin: Option<String>,
    pub update_interval: Option<u64>,
    #[serde(default)]
    pub server: FileServerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub vin: Option<String>,
    pub update_interval: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Resolved and validated configuration
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Config {
    #[validate(url)]
    pub api_url: String,
    #[validate(length(min = 1))]
    pub vin: Option<String>,
    /// Minutes between refresh cycles
    #[validate(range(min = MIN_UPDATE_INTERVAL_MINUTES, max = MAX_UPDATE_INTERVAL_MINUTES))]
    pub update_interval: u64,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Merge overrides over the file and validate the result
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let config = Self {
            api_url: overrides
                .api_url
                .or(file.api_url)
                .ok_or(ConfigError::Missing("api_url"))?,
            vin: overrides.vin.or(file.vin),
            update_interval: overrides
                .update_interval
                .or(file.update_interval)
                .unwrap_or(DEFAULT_UPDATE_INTERVAL_MINUTES),
            host: overrides
                .host
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides
                .port
                .or(file.server.port)
                .unwrap_or(DEFAULT_PORT),
        };
        config.validate()?;
        config.listen_addr()?;
        Ok(config)
    }

    /// Load from an optional file, then apply overrides
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, overrides)
    }

    pub fn mode(&self) -> CoordinatorMode {
        CoordinatorMode::from_vin(self.vin.clone())
    }

    pub fn update_interval(&self) -> Duration {
        update_interval_from_minutes(self.update_interval)
    }

    /// Listen address; `host` is an IP literal or a resolvable name
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::ListenAddr(self.host.clone()))
    }
}
