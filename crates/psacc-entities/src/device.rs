//! Device registry entry shared by all entities of one vehicle

use psacc_core::{VehicleRecord, DOMAIN, MANUFACTURER};
use serde::Serialize;

/// Device grouping for one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sw_version: Option<String>,
}

impl DeviceInfo {
    pub fn from_record(vin: &str, record: &VehicleRecord) -> Self {
        let text = |key: &str| record.get(key).and_then(|v| v.as_str());
        let brand = text("brand").unwrap_or(MANUFACTURER);
        let model = text("model");

        Self {
            identifiers: vec![(DOMAIN.to_string(), vin.to_string())],
            name: format!("{} {}", brand, model.unwrap_or("Car")),
            manufacturer: MANUFACTURER.to_string(),
            model: model.unwrap_or("Connected Car").to_string(),
            sw_version: text("firmware_version").map(str::to_owned),
        }
    }
}
