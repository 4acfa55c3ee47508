//! Total lookups into vehicle status JSON.
//!
//! The remote status payload is loosely structured and fields come and go
//! with vehicle model and firmware. Every helper here returns `None` rather
//! than panicking when a level is missing or has the wrong type.

use serde_json::{Map, Value};

use crate::record::VehicleRecord;

/// Walk nested object keys starting at the record root.
///
/// ```
/// # use psacc_core::lookup::path;
/// let record = serde_json::json!({"odometer": {"mileage": 1234.5}});
/// let record = record.as_object().unwrap();
/// assert_eq!(path(record, &["odometer", "mileage"]).and_then(|v| v.as_f64()), Some(1234.5));
/// assert!(path(record, &["odometer", "missing"]).is_none());
/// ```
pub fn path<'a>(record: &'a VehicleRecord, keys: &[&str]) -> Option<&'a Value> {
    let (first, rest) = keys.split_first()?;
    let mut current = record.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Object at `keys`, if present and an object
pub fn object_at<'a>(record: &'a VehicleRecord, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    path(record, keys)?.as_object()
}

/// Energy entry `index` (0 = traction battery, 1 = fuel tank on hybrids)
pub fn energy(record: &VehicleRecord, index: usize) -> Option<&Map<String, Value>> {
    record.get("energy")?.as_array()?.get(index)?.as_object()
}

/// First energy entry
pub fn primary_energy(record: &VehicleRecord) -> Option<&Map<String, Value>> {
    energy(record, 0)
}

/// Charging block of the primary energy entry
pub fn charging(record: &VehicleRecord) -> Option<&Map<String, Value>> {
    primary_energy(record)?.get("charging")?.as_object()
}

/// Air-conditioning block of the preconditioning status.
///
/// The remote service spells the key `preconditionning`.
pub fn air_conditioning(record: &VehicleRecord) -> Option<&Map<String, Value>> {
    object_at(record, &["preconditionning", "airConditioning"])
}

/// String field of an object
pub fn str_field<'a>(object: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a str> {
    object?.get(key)?.as_str()
}

/// Numeric field of an object
pub fn f64_field(object: Option<&Map<String, Value>>, key: &str) -> Option<f64> {
    object?.get(key)?.as_f64()
}

/// Whether the charging status reports an active charge
pub fn is_charging(record: &VehicleRecord) -> bool {
    str_field(charging(record), "status") == Some("InProgress")
}

/// Whether the charge cable is plugged in
pub fn is_plugged(record: &VehicleRecord) -> bool {
    charging(record)
        .and_then(|c| c.get("plugged"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Whether climate preconditioning is enabled or running
pub fn is_climate_active(record: &VehicleRecord) -> bool {
    matches!(
        str_field(air_conditioning(record), "status"),
        Some("Enabled") | Some("InProgress")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> VehicleRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_path_stops_at_non_object() {
        let r = record(json!({"doors": "closed"}));
        assert!(path(&r, &["doors", "driver"]).is_none());
        assert!(path(&r, &[]).is_none());
    }

    #[test]
    fn test_energy_index_out_of_range() {
        let r = record(json!({"energy": []}));
        assert!(primary_energy(&r).is_none());
        assert!(charging(&r).is_none());
        assert!(!is_charging(&r));
        assert!(!is_plugged(&r));
    }

    #[test]
    fn test_energy_not_a_list() {
        let r = record(json!({"energy": {"level": 50}}));
        assert!(primary_energy(&r).is_none());
    }

    #[test]
    fn test_charging_flags() {
        let r = record(json!({
            "energy": [{"charging": {"status": "InProgress", "plugged": true}}]
        }));
        assert!(is_charging(&r));
        assert!(is_plugged(&r));
    }

    #[test]
    fn test_climate_states() {
        for (status, expected) in [("Enabled", true), ("InProgress", true), ("Disabled", false)] {
            let r = record(json!({
                "preconditionning": {"airConditioning": {"status": status}}
            }));
            assert_eq!(is_climate_active(&r), expected, "status {}", status);
        }
        assert!(!is_climate_active(&record(json!({}))));
    }
}
