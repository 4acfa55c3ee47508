//! Shared handles passed to every entity

use std::sync::Arc;

use psacc_core::{RefreshTrigger, VehicleApi, VehicleDataSource, VehicleRecord};

use crate::error::{EntityError, EntityResult};

/// Handles an entity needs: the API for commands, the cache for state and
/// the trigger for follow-up refreshes.
///
/// The coordinator implements both [`VehicleDataSource`] and
/// [`RefreshTrigger`], so one `Arc<Coordinator>` usually fills both slots.
#[derive(Clone)]
pub struct VehicleContext {
    pub api: Arc<dyn VehicleApi>,
    pub source: Arc<dyn VehicleDataSource>,
    pub refresh: Arc<dyn RefreshTrigger>,
}

impl VehicleContext {
    pub fn new(
        api: Arc<dyn VehicleApi>,
        source: Arc<dyn VehicleDataSource>,
        refresh: Arc<dyn RefreshTrigger>,
    ) -> Self {
        Self {
            api,
            source,
            refresh,
        }
    }

    /// Cached record, empty when unknown
    pub fn record(&self, vin: &str) -> VehicleRecord {
        self.source.get_vehicle_data(vin)
    }

    /// Last refresh succeeded and the vehicle is cached
    pub fn is_available(&self, vin: &str) -> bool {
        self.source.last_update_success() && self.source.contains(vin)
    }

    /// Commands are only accepted for vehicles that have entities
    pub(crate) fn require_vehicle(&self, vin: &str) -> EntityResult<()> {
        if self.source.contains(vin) {
            Ok(())
        } else {
            Err(EntityError::VehicleNotFound(vin.to_string()))
        }
    }
}
