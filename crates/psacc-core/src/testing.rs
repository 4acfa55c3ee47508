//! Test utilities: a scriptable in-memory [`VehicleApi`]
//!
//! Used by the coordinator, entity and API test suites in place of the HTTP
//! client. Every call is recorded so tests can assert on what was (or was
//! not) sent to the remote service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::backend::VehicleApi;
use crate::error::{ApiError, ApiResult};

/// One call received by [`MockVehicleApi`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListVehicles,
    Status(String),
    StartCharge(String),
    StopCharge(String),
    SetChargeThreshold(String, u8),
    SetChargeSchedule(String, String, String),
    StartClimate(String, f64),
    StopClimate(String),
    Wakeup(String),
    Horn(String, u8),
    FlashLights(String, u8),
    LockDoors(String),
    UnlockDoors(String),
}

/// Scriptable vehicle API
pub struct MockVehicleApi {
    listing: Mutex<ApiResult<Vec<Value>>>,
    statuses: Mutex<HashMap<String, ApiResult<Value>>>,
    command_result: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockVehicleApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVehicleApi {
    /// Empty listing, no statuses, commands succeed
    pub fn new() -> Self {
        Self {
            listing: Mutex::new(Ok(Vec::new())),
            statuses: Mutex::new(HashMap::new()),
            command_result: Mutex::new(true),
            delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Listing that returns one `{vin}` entry per VIN
    pub fn with_vehicles(vins: &[&str]) -> Self {
        let api = Self::new();
        api.set_listing(Ok(vins.iter().map(|vin| json!({ "vin": vin })).collect()));
        api
    }

    pub fn set_listing(&self, listing: ApiResult<Vec<Value>>) {
        *self.listing.lock() = listing;
    }

    pub fn set_status(&self, vin: &str, status: ApiResult<Value>) {
        self.statuses.lock().insert(vin.to_string(), status);
    }

    /// Result every command reports
    pub fn set_command_result(&self, ok: bool) {
        *self.command_result.lock() = ok;
    }

    /// Delay applied to every read, to widen race windows
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn list_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::ListVehicles))
    }

    pub fn status_calls(&self, vin: &str) -> usize {
        self.count(|c| matches!(c, Call::Status(v) if v == vin))
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| predicate(c)).count()
    }

    /// Highest number of reads that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn read<T: Clone>(&self, call: Call, result: impl FnOnce() -> ApiResult<T>) -> ApiResult<T> {
        self.calls.lock().push(call);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result()
    }

    fn command(&self, call: Call) -> bool {
        self.calls.lock().push(call);
        *self.command_result.lock()
    }
}

#[async_trait]
impl VehicleApi for MockVehicleApi {
    async fn list_vehicles(&self) -> ApiResult<Vec<Value>> {
        self.read(Call::ListVehicles, || self.listing.lock().clone())
            .await
    }

    async fn get_vehicle_status(&self, vin: &str) -> ApiResult<Value> {
        self.read(Call::Status(vin.to_string()), || {
            self.statuses
                .lock()
                .get(vin)
                .cloned()
                .unwrap_or_else(|| Err(ApiError::connection(format!("no status for {}", vin))))
        })
        .await
    }

    async fn start_charge(&self, vin: &str) -> bool {
        self.command(Call::StartCharge(vin.to_string()))
    }

    async fn stop_charge(&self, vin: &str) -> bool {
        self.command(Call::StopCharge(vin.to_string()))
    }

    async fn set_charge_threshold(&self, vin: &str, threshold: u8) -> bool {
        self.command(Call::SetChargeThreshold(vin.to_string(), threshold))
    }

    async fn set_charge_schedule(&self, vin: &str, start_time: &str, end_time: &str) -> bool {
        self.command(Call::SetChargeSchedule(
            vin.to_string(),
            start_time.to_string(),
            end_time.to_string(),
        ))
    }

    async fn start_climate(&self, vin: &str, temperature: f64) -> bool {
        self.command(Call::StartClimate(vin.to_string(), temperature))
    }

    async fn stop_climate(&self, vin: &str) -> bool {
        self.command(Call::StopClimate(vin.to_string()))
    }

    async fn wakeup(&self, vin: &str) -> bool {
        self.command(Call::Wakeup(vin.to_string()))
    }

    async fn horn(&self, vin: &str, count: u8) -> bool {
        self.command(Call::Horn(vin.to_string(), count))
    }

    async fn flash_lights(&self, vin: &str, count: u8) -> bool {
        self.command(Call::FlashLights(vin.to_string(), count))
    }

    async fn lock_doors(&self, vin: &str) -> bool {
        self.command(Call::LockDoors(vin.to_string()))
    }

    async fn unlock_doors(&self, vin: &str) -> bool {
        self.command(Call::UnlockDoors(vin.to_string()))
    }
}
