//! VehicleApi trait - the seam between this bridge and the remote telematics service

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiResult;

/// Remote vehicle API
///
/// Two failure policies coexist on this trait:
///
/// - reads that feed the coordinator cache (`list_vehicles`,
///   `get_vehicle_status`) propagate their error so the coordinator can decide
///   whether to keep stale data;
/// - commands swallow and log any error and return `true` only when the call
///   completed. They never fail the UI action that triggered them.
#[async_trait]
pub trait VehicleApi: Send + Sync {
    /// List vehicles with their static metadata.
    ///
    /// A response that is not a JSON array yields an empty list.
    async fn list_vehicles(&self) -> ApiResult<Vec<Value>>;

    /// List vehicles, returning an empty list on any failure
    async fn get_vehicles(&self) -> Vec<Value> {
        match self.list_vehicles().await {
            Ok(vehicles) => vehicles,
            Err(e) => {
                tracing::error!(error = %e, "Failed to get vehicles");
                Vec::new()
            }
        }
    }

    /// Fetch the dynamic status snapshot of one vehicle
    async fn get_vehicle_status(&self, vin: &str) -> ApiResult<Value>;

    /// Start charging now
    async fn start_charge(&self, vin: &str) -> bool;

    /// Stop charging
    async fn stop_charge(&self, vin: &str) -> bool;

    /// Set the charge threshold (percentage)
    async fn set_charge_threshold(&self, vin: &str, threshold: u8) -> bool;

    /// Set the charge schedule window
    async fn set_charge_schedule(&self, vin: &str, start_time: &str, end_time: &str) -> bool;

    /// Start climate preconditioning at the given temperature (°C)
    async fn start_climate(&self, vin: &str, temperature: f64) -> bool;

    /// Stop climate preconditioning
    async fn stop_climate(&self, vin: &str) -> bool;

    /// Wake the vehicle up
    async fn wakeup(&self, vin: &str) -> bool;

    /// Sound the horn `count` times
    async fn horn(&self, vin: &str, count: u8) -> bool;

    /// Flash the lights `count` times
    async fn flash_lights(&self, vin: &str, count: u8) -> bool;

    /// Lock the doors
    async fn lock_doors(&self, vin: &str) -> bool;

    /// Unlock the doors
    async fn unlock_doors(&self, vin: &str) -> bool;

    /// Check that the remote service is reachable
    async fn test_connection(&self) -> bool {
        match self.list_vehicles().await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Connection test failed");
                false
            }
        }
    }
}
