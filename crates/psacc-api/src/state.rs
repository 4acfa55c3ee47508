//! Application state for the REST API

use std::sync::Arc;

use psacc_coordinator::Coordinator;
use psacc_core::{VehicleApi, VehicleDataSource};
use psacc_entities::VehicleContext;

use crate::error::ApiError;

/// Application state shared across all handlers
///
/// Built once per configured service: the client and the coordinator that
/// polls it are injected here instead of being looked up globally.
#[derive(Clone)]
pub struct AppState {
    coordinator: Arc<Coordinator>,
    entities: VehicleContext,
}

impl AppState {
    pub fn new(api: Arc<dyn VehicleApi>, coordinator: Arc<Coordinator>) -> Self {
        let entities = VehicleContext::new(api, coordinator.clone(), coordinator.clone());
        Self {
            coordinator,
            entities,
        }
    }

    /// Use the coordinator's own client for commands
    pub fn from_coordinator(coordinator: Arc<Coordinator>) -> Self {
        Self::new(coordinator.api().clone(), coordinator)
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub fn entities(&self) -> &VehicleContext {
        &self.entities
    }

    pub fn api(&self) -> &Arc<dyn VehicleApi> {
        &self.entities.api
    }

    /// Fail with 404 unless `vin` is in the cache
    pub fn require_vehicle(&self, vin: &str) -> Result<(), ApiError> {
        if self.coordinator.contains(vin) {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("Vehicle not found: {}", vin)))
        }
    }
}
