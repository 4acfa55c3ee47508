//! GPS location of a vehicle

use psacc_core::lookup::{object_at, path};
use psacc_core::VehicleRecord;
use serde_json::{json, Value};

use crate::state::{EntityState, Platform};

/// Fixed accuracy reported for every position, in meters
pub const LOCATION_ACCURACY: u32 = 50;

/// Latitude and longitude, present only with at least two coordinates.
///
/// The service reports GeoJSON order: `[longitude, latitude, ...]`.
pub fn coordinates(record: &VehicleRecord) -> Option<(f64, f64)> {
    let coordinates = path(record, &["position", "geometry", "coordinates"])?.as_array()?;
    if coordinates.len() < 2 {
        return None;
    }
    Some((coordinates[1].as_f64()?, coordinates[0].as_f64()?))
}

pub fn render(vin: &str, record: &VehicleRecord, available: bool) -> EntityState {
    let properties = object_at(record, &["position", "properties"]);
    let property = |key: &str| {
        properties
            .and_then(|p| p.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    };

    let state = match coordinates(record) {
        Some((latitude, longitude)) => json!({"latitude": latitude, "longitude": longitude}),
        None => Value::Null,
    };

    EntityState::new(
        Platform::DeviceTracker,
        vin,
        "location",
        "location",
        "Location",
        "mdi:map-marker",
    )
    .state(state)
    .available(available)
    .attribute("source_type", "gps")
    .attribute("gps_accuracy", LOCATION_ACCURACY)
    .attribute("altitude", property("altitude"))
    .attribute("heading", property("heading"))
    .attribute("updated_at", property("updatedAt"))
    .attribute("signal_quality", property("signalQuality"))
}
