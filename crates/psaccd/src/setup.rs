//! Configuration-time validation
//!
//! Before a configuration is accepted, the remote service is probed once: the
//! configured vehicle's status in fixed mode, the vehicle listing otherwise.

use psacc_coordinator::{CoordinatorMode, RefreshError};
use psacc_core::{ApiError, VehicleApi};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

pub const DEFAULT_TITLE: &str = "PSA Car Controller";

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Cannot connect to the vehicle service: {0}")]
    CannotConnect(ApiError),

    #[error("Unexpected error while validating the vehicle service: {0}")]
    Unknown(ApiError),

    /// Configuration accepted but the first refresh failed
    #[error("Vehicle service not ready: {0}")]
    NotReady(#[from] RefreshError),
}

impl SetupError {
    /// Stable error code reported for a rejected configuration
    pub fn code(&self) -> &'static str {
        match self {
            SetupError::CannotConnect(_) => "cannot_connect",
            SetupError::Unknown(_) => "unknown",
            SetupError::NotReady(_) => "not_ready",
        }
    }
}

impl From<ApiError> for SetupError {
    fn from(e: ApiError) -> Self {
        if e.is_connection() {
            SetupError::CannotConnect(e)
        } else {
            SetupError::Unknown(e)
        }
    }
}

/// An accepted configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub title: String,
    pub unique_id: String,
    pub api_url: String,
    pub vin: Option<String>,
    pub update_interval: u64,
}

impl ConfigEntry {
    pub fn from_config(config: &Config) -> Self {
        let (title, unique_id) = match config.mode() {
            CoordinatorMode::Fixed { vin } => (
                format!("{} ({})", DEFAULT_TITLE, vin_suffix(&vin)),
                format!("{}_{}", config.api_url, vin),
            ),
            CoordinatorMode::Discovery => (DEFAULT_TITLE.to_string(), config.api_url.clone()),
        };
        Self {
            title,
            unique_id,
            api_url: config.api_url.clone(),
            vin: config.vin.clone(),
            update_interval: config.update_interval,
        }
    }
}

fn vin_suffix(vin: &str) -> &str {
    let start = vin
        .char_indices()
        .rev()
        .nth(3)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &vin[start..]
}

/// Probe the remote service and accept or reject `config`
pub async fn validate_setup(api: &dyn VehicleApi, config: &Config) -> Result<ConfigEntry, SetupError> {
    let probe = match config.mode() {
        CoordinatorMode::Fixed { vin } => api.get_vehicle_status(&vin).await.map(|_| ()),
        CoordinatorMode::Discovery => api.list_vehicles().await.map(|_| ()),
    };

    if let Err(e) = probe {
        let err = SetupError::from(e);
        warn!(code = err.code(), error = %err, "Configuration rejected");
        return Err(err);
    }

    let entry = ConfigEntry::from_config(config);
    info!(title = %entry.title, unique_id = %entry.unique_id, "Configuration accepted");
    Ok(entry)
}
