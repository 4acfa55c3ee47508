//! Cached vehicle data

use axum::extract::{Path, State};
use axum::Json;
use psacc_core::{VehicleDataSource, VehicleMap, VehicleRecord};

use crate::state::AppState;

/// Full cache snapshot keyed by VIN, in discovery order
pub async fn list_vehicles(State(state): State<AppState>) -> Json<VehicleMap> {
    let snapshot = state.coordinator().get_all_vehicles();
    Json(VehicleMap::clone(&snapshot))
}

/// One cached record; unknown VINs read as an empty object
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Json<VehicleRecord> {
    Json(state.coordinator().get_vehicle_data(&vin))
}
