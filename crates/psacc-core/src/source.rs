//! Read and refresh interfaces exposed by the coordinator

use std::sync::Arc;

use crate::record::{VehicleMap, VehicleRecord};

/// Read-only view over the coordinator cache
pub trait VehicleDataSource: Send + Sync {
    /// Cached record for `vin`, or an empty record if the VIN is unknown
    fn get_vehicle_data(&self, vin: &str) -> VehicleRecord;

    /// The full current cache
    fn get_all_vehicles(&self) -> Arc<VehicleMap>;

    /// Whether the most recent refresh cycle succeeded
    fn last_update_success(&self) -> bool;

    /// Whether `vin` currently has a cached record
    fn contains(&self, vin: &str) -> bool {
        self.get_all_vehicles().contains_key(vin)
    }
}

/// Demand-refresh trigger used after state-changing commands
pub trait RefreshTrigger: Send + Sync {
    /// Schedule one extra refresh cycle without waiting for it.
    ///
    /// Rapid requests coalesce; they never queue unbounded cycles.
    fn request_refresh(&self);
}
