//! Coordinator - Cached, periodically refreshed view of every vehicle
//!
//! One refresh cycle:
//! 1. On the first successful cycle, discover the vehicles (listing in
//!    discovery mode, the configured VIN in fixed mode). The result is
//!    kept for the lifetime of the coordinator.
//! 2. Fetch each vehicle's status in listing order and merge it over the
//!    vehicle's metadata.
//! 3. Swap the cache in one step.
//!
//! A failed status fetch only affects that vehicle: its previous record is
//! carried forward. A failed listing fails the whole cycle and leaves the
//! cache untouched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use psacc_core::record::listing_vin;
use psacc_core::{
    merge_record, ApiError, RefreshTrigger, VehicleApi, VehicleDataSource, VehicleMap,
    VehicleRecord,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{watch, Mutex, Notify};
use tracing::{debug, info, warn};

/// How the coordinator finds the vehicles it tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorMode {
    /// Ask the service for its vehicle listing on the first cycle
    Discovery,
    /// Track exactly one configured vehicle, never list
    Fixed { vin: String },
}

impl CoordinatorMode {
    /// Fixed mode when a VIN is configured, discovery otherwise
    pub fn from_vin(vin: Option<String>) -> Self {
        match vin {
            Some(vin) if !vin.is_empty() => Self::Fixed { vin },
            _ => Self::Discovery,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Fixed { .. } => "fixed",
        }
    }
}

/// A refresh cycle that produced no new cache
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("Error communicating with API: {0}")]
    UpdateFailed(#[from] ApiError),
}

/// Point-in-time health of the coordinator
#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorStatus {
    pub mode: &'static str,
    pub last_update_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    pub update_interval_secs: u64,
    pub vehicle_count: usize,
}

#[derive(Debug)]
struct Health {
    last_update_success: bool,
    last_error: Option<ApiError>,
    last_update: Option<DateTime<Utc>>,
}

/// Polling coordinator
///
/// Readers go through [`VehicleDataSource`] and only ever clone an `Arc`
/// to the current cache. Refresh cycles are serialized: concurrent callers
/// of [`Coordinator::refresh`] queue behind the running cycle.
pub struct Coordinator {
    api: Arc<dyn VehicleApi>,
    mode: CoordinatorMode,
    /// Discovered vehicle metadata by VIN. Its lock also serializes cycles.
    vehicles: Mutex<VehicleMap>,
    data: RwLock<Arc<VehicleMap>>,
    health: RwLock<Health>,
    update_interval: RwLock<Duration>,
    refresh_requested: Notify,
    interval_changed: Notify,
}

impl Coordinator {
    pub fn new(api: Arc<dyn VehicleApi>, mode: CoordinatorMode, update_interval: Duration) -> Self {
        info!(
            mode = mode.as_str(),
            interval_secs = update_interval.as_secs(),
            "Creating vehicle coordinator"
        );
        Self {
            api,
            mode,
            vehicles: Mutex::new(VehicleMap::new()),
            data: RwLock::new(Arc::new(VehicleMap::new())),
            health: RwLock::new(Health {
                last_update_success: true,
                last_error: None,
                last_update: None,
            }),
            update_interval: RwLock::new(update_interval),
            refresh_requested: Notify::new(),
            interval_changed: Notify::new(),
        }
    }

    pub fn mode(&self) -> &CoordinatorMode {
        &self.mode
    }

    pub fn api(&self) -> &Arc<dyn VehicleApi> {
        &self.api
    }

    pub fn update_interval(&self) -> Duration {
        *self.update_interval.read()
    }

    /// Change the polling period; a running loop re-arms its timer
    pub fn set_update_interval(&self, interval: Duration) {
        *self.update_interval.write() = interval;
        info!(interval_secs = interval.as_secs(), "Update interval changed");
        self.interval_changed.notify_one();
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.health.read().last_error.clone()
    }

    pub fn status(&self) -> CoordinatorStatus {
        let health = self.health.read();
        CoordinatorStatus {
            mode: self.mode.as_str(),
            last_update_success: health.last_update_success,
            last_error: health.last_error.as_ref().map(ToString::to_string),
            last_update: health.last_update,
            update_interval_secs: self.update_interval().as_secs(),
            vehicle_count: self.data.read().len(),
        }
    }

    /// Initial refresh before the coordinator is handed to consumers
    ///
    /// Same as [`Coordinator::refresh`]; callers treat a failure as "not
    /// ready yet" and retry later.
    pub async fn first_refresh(&self) -> Result<(), RefreshError> {
        self.refresh().await.inspect_err(|e| {
            warn!(error = %e, "Initial vehicle data refresh failed");
        })
    }

    /// Run one refresh cycle
    pub async fn refresh(&self) -> Result<(), RefreshError> {
        let mut vehicles = self.vehicles.lock().await;
        let started = Instant::now();

        match self.fetch(&mut vehicles).await {
            Ok(data) => {
                let count = data.len();
                *self.data.write() = Arc::new(data);

                let mut health = self.health.write();
                if !health.last_update_success {
                    info!("Fetching vehicle data recovered");
                }
                health.last_update_success = true;
                health.last_error = None;
                health.last_update = Some(Utc::now());

                debug!(
                    vehicles = count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Finished fetching vehicle data"
                );
                Ok(())
            }
            Err(e) => {
                let RefreshError::UpdateFailed(api_error) = &e;
                let mut health = self.health.write();
                health.last_update_success = false;
                health.last_error = Some(api_error.clone());

                warn!(error = %e, "Fetching vehicle data failed");
                Err(e)
            }
        }
    }

    async fn fetch(&self, vehicles: &mut VehicleMap) -> Result<VehicleMap, RefreshError> {
        if vehicles.is_empty() {
            self.discover(vehicles).await?;
        }

        let previous = self.data.read().clone();
        let mut data = VehicleMap::with_capacity(vehicles.len());

        for (vin, metadata) in vehicles.iter() {
            let record = self
                .api
                .get_vehicle_status(vin)
                .await
                .and_then(|status| merge_record(metadata, status));

            match record {
                Ok(record) => {
                    data.insert(vin.clone(), record);
                }
                Err(e) => {
                    warn!(vin = %vin, error = %e, "Failed to update vehicle");
                    if let Some(stale) = previous.get(vin) {
                        data.insert(vin.clone(), stale.clone());
                    }
                }
            }
        }

        Ok(data)
    }

    async fn discover(&self, vehicles: &mut VehicleMap) -> Result<(), RefreshError> {
        match &self.mode {
            CoordinatorMode::Fixed { vin } => {
                let mut metadata = VehicleRecord::new();
                metadata.insert("vin".to_string(), Value::String(vin.clone()));
                vehicles.insert(vin.clone(), metadata);
            }
            CoordinatorMode::Discovery => {
                let listing = self.api.list_vehicles().await?;
                for entry in listing {
                    let Some(vin) = listing_vin(&entry).map(str::to_owned) else {
                        debug!(entry = %entry, "Skipping listing entry without VIN");
                        continue;
                    };
                    let metadata = match entry {
                        Value::Object(map) => map,
                        _ => VehicleRecord::new(),
                    };
                    vehicles.insert(vin, metadata);
                }
                if vehicles.is_empty() {
                    info!("No vehicles found, will list again next cycle");
                } else {
                    info!(count = vehicles.len(), "Discovered vehicles");
                }
            }
        }
        Ok(())
    }

    /// Refresh every update interval until `shutdown` changes
    ///
    /// Requests made through [`RefreshTrigger::request_refresh`] run a cycle
    /// early. Any number of requests made while a cycle is running collapse
    /// into one follow-up cycle.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Vehicle coordinator started");
        loop {
            let interval = self.update_interval();
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = self.refresh_requested.notified() => {
                    debug!("Refresh requested");
                }
                _ = self.interval_changed.notified() => continue,
                _ = shutdown.changed() => break,
            }

            tokio::select! {
                // Failures are logged and recorded in health by refresh()
                _ = self.refresh() => {}
                _ = shutdown.changed() => break,
            }
        }
        info!("Vehicle coordinator stopped");
    }
}

impl VehicleDataSource for Coordinator {
    fn get_vehicle_data(&self, vin: &str) -> VehicleRecord {
        self.data.read().get(vin).cloned().unwrap_or_default()
    }

    fn get_all_vehicles(&self) -> Arc<VehicleMap> {
        self.data.read().clone()
    }

    fn last_update_success(&self) -> bool {
        self.health.read().last_update_success
    }
}

impl RefreshTrigger for Coordinator {
    fn request_refresh(&self) {
        self.refresh_requested.notify_one();
    }
}
