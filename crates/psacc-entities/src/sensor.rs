//! Sensor entities
//!
//! Values are passed through as the service reports them (integers stay
//! integers); the only derived values are the total range, the charging
//! figures gated on an active charge and the parsed update timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use psacc_core::lookup::{charging, energy, is_charging, path, primary_energy};
use psacc_core::VehicleRecord;
use serde_json::{json, Value};

use crate::state::{EntityState, Platform};

/// Static description of a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescription {
    pub suffix: &'static str,
    pub name: &'static str,
    pub device_class: Option<&'static str>,
    pub unit: Option<&'static str>,
    pub state_class: Option<&'static str>,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    BatteryLevel,
    RangeElectric,
    RangeTotal,
    Mileage,
    ChargingPower,
    ChargingTime,
    Consumption,
    ExteriorTemperature,
    ChargeThreshold,
    LastUpdate,
}

const MEASUREMENT: Option<&str> = Some("measurement");

impl SensorKind {
    pub const ALL: [SensorKind; 10] = [
        SensorKind::BatteryLevel,
        SensorKind::RangeElectric,
        SensorKind::RangeTotal,
        SensorKind::Mileage,
        SensorKind::ChargingPower,
        SensorKind::ChargingTime,
        SensorKind::Consumption,
        SensorKind::ExteriorTemperature,
        SensorKind::ChargeThreshold,
        SensorKind::LastUpdate,
    ];

    pub fn description(&self) -> SensorDescription {
        let (suffix, name, device_class, unit, state_class, icon) = match self {
            SensorKind::BatteryLevel => (
                "battery_level",
                "Battery level",
                Some("battery"),
                Some("%"),
                MEASUREMENT,
                "mdi:battery",
            ),
            SensorKind::RangeElectric => (
                "range_electric",
                "Range electric",
                Some("distance"),
                Some("km"),
                MEASUREMENT,
                "mdi:map-marker-distance",
            ),
            SensorKind::RangeTotal => (
                "range_total",
                "Range total",
                Some("distance"),
                Some("km"),
                MEASUREMENT,
                "mdi:map-marker-distance",
            ),
            SensorKind::Mileage => (
                "mileage",
                "Mileage",
                Some("distance"),
                Some("km"),
                Some("total_increasing"),
                "mdi:counter",
            ),
            SensorKind::ChargingPower => (
                "charging_power",
                "Charging power",
                Some("power"),
                Some("kW"),
                MEASUREMENT,
                "mdi:ev-station",
            ),
            SensorKind::ChargingTime => (
                "charging_time",
                "Charging time remaining",
                Some("duration"),
                Some("min"),
                None,
                "mdi:ev-station",
            ),
            SensorKind::Consumption => (
                "consumption",
                "Average consumption",
                None,
                Some("kWh/100km"),
                MEASUREMENT,
                "mdi:gauge",
            ),
            SensorKind::ExteriorTemperature => (
                "temperature_exterior",
                "Exterior temperature",
                Some("temperature"),
                Some("°C"),
                MEASUREMENT,
                "mdi:thermometer",
            ),
            SensorKind::ChargeThreshold => (
                "charge_threshold",
                "Charge threshold",
                None,
                Some("%"),
                MEASUREMENT,
                "mdi:battery",
            ),
            SensorKind::LastUpdate => (
                "last_update",
                "Last update",
                Some("timestamp"),
                None,
                None,
                "mdi:update",
            ),
        };
        SensorDescription {
            suffix,
            name,
            device_class,
            unit,
            state_class,
            icon,
        }
    }

    /// Current value, `None` when the record does not carry it
    pub fn value(&self, record: &VehicleRecord) -> Option<Value> {
        match self {
            SensorKind::BatteryLevel => present(primary_energy(record).and_then(|e| e.get("level"))),
            SensorKind::RangeElectric => {
                present(primary_energy(record).and_then(|e| e.get("autonomy")))
            }
            SensorKind::RangeTotal => range_total(record),
            SensorKind::Mileage => present(path(record, &["odometer", "mileage"])),
            SensorKind::ChargingPower => {
                if is_charging(record) {
                    present(charging(record).and_then(|c| c.get("rate")))
                } else {
                    Some(json!(0))
                }
            }
            SensorKind::ChargingTime => {
                if is_charging(record) {
                    present(charging(record).and_then(|c| c.get("remaining_time")))
                } else {
                    None
                }
            }
            SensorKind::Consumption => present(path(record, &["environment", "consumption"])),
            SensorKind::ExteriorTemperature => {
                present(path(record, &["environment", "temperature"]))
            }
            SensorKind::ChargeThreshold => Some(
                present(charging(record).and_then(|c| c.get("charge_threshold")))
                    .unwrap_or_else(|| json!(100)),
            ),
            SensorKind::LastUpdate => record
                .get("updatedAt")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
                .map(Value::String),
        }
    }

    pub fn render(&self, vin: &str, record: &VehicleRecord, available: bool) -> EntityState {
        let desc = self.description();
        EntityState::new(
            Platform::Sensor,
            vin,
            desc.suffix,
            desc.suffix,
            desc.name,
            desc.icon,
        )
        .device_class(desc.device_class)
        .unit(desc.unit)
        .state_class(desc.state_class)
        .state(self.value(record).unwrap_or(Value::Null))
        .available(available)
    }
}

fn present(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

/// Electric plus fuel range; `None` when both are zero or absent
fn range_total(record: &VehicleRecord) -> Option<Value> {
    let autonomy = |index| {
        energy(record, index)
            .and_then(|e| e.get("autonomy"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };
    let (electric, fuel) = (autonomy(0), autonomy(1));
    if electric == 0.0 && fuel == 0.0 {
        return None;
    }

    let total = electric + fuel;
    if total.fract() == 0.0 && total.abs() < i64::MAX as f64 {
        Some(json!(total as i64))
    } else {
        Some(json!(total))
    }
}

/// RFC 3339 timestamp normalized to UTC
fn parse_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(value: Value) -> VehicleRecord {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> VehicleRecord {
        record(json!({
            "vin": "VF1AAA",
            "energy": [
                {
                    "level": 72,
                    "autonomy": 210,
                    "charging": {
                        "status": "InProgress",
                        "plugged": true,
                        "rate": 7.4,
                        "remaining_time": 95,
                        "charge_threshold": 80
                    }
                },
                {"autonomy": 300}
            ],
            "odometer": {"mileage": 12034.5},
            "environment": {"consumption": 15.2, "temperature": 9},
            "updatedAt": "2024-03-01T10:15:30+01:00"
        }))
    }

    #[test]
    fn test_values_from_full_record() {
        let r = sample();
        assert_eq!(SensorKind::BatteryLevel.value(&r), Some(json!(72)));
        assert_eq!(SensorKind::RangeElectric.value(&r), Some(json!(210)));
        assert_eq!(SensorKind::RangeTotal.value(&r), Some(json!(510)));
        assert_eq!(SensorKind::Mileage.value(&r), Some(json!(12034.5)));
        assert_eq!(SensorKind::ChargingPower.value(&r), Some(json!(7.4)));
        assert_eq!(SensorKind::ChargingTime.value(&r), Some(json!(95)));
        assert_eq!(SensorKind::Consumption.value(&r), Some(json!(15.2)));
        assert_eq!(SensorKind::ExteriorTemperature.value(&r), Some(json!(9)));
        assert_eq!(SensorKind::ChargeThreshold.value(&r), Some(json!(80)));
        assert_eq!(
            SensorKind::LastUpdate.value(&r),
            Some(json!("2024-03-01T09:15:30Z"))
        );
    }

    #[test]
    fn test_empty_record_never_panics() {
        let r = VehicleRecord::new();
        for kind in SensorKind::ALL {
            let value = kind.value(&r);
            match kind {
                SensorKind::ChargingPower => assert_eq!(value, Some(json!(0))),
                SensorKind::ChargeThreshold => assert_eq!(value, Some(json!(100))),
                _ => assert_eq!(value, None, "{:?}", kind),
            }
        }
    }

    #[test]
    fn test_malformed_shapes_yield_none() {
        let r = record(json!({
            "energy": "broken",
            "odometer": [1, 2],
            "environment": null,
            "updatedAt": "yesterday"
        }));
        assert_eq!(SensorKind::BatteryLevel.value(&r), None);
        assert_eq!(SensorKind::RangeTotal.value(&r), None);
        assert_eq!(SensorKind::Mileage.value(&r), None);
        assert_eq!(SensorKind::Consumption.value(&r), None);
        assert_eq!(SensorKind::LastUpdate.value(&r), None);
    }

    #[test]
    fn test_range_total() {
        let electric_only = record(json!({"energy": [{"autonomy": 150}]}));
        assert_eq!(SensorKind::RangeTotal.value(&electric_only), Some(json!(150)));

        let fuel_only = record(json!({"energy": [{}, {"autonomy": 420.5}]}));
        assert_eq!(SensorKind::RangeTotal.value(&fuel_only), Some(json!(420.5)));

        let both_zero = record(json!({"energy": [{"autonomy": 0}, {"autonomy": 0}]}));
        assert_eq!(SensorKind::RangeTotal.value(&both_zero), None);
    }

    #[test]
    fn test_charging_figures_only_while_charging() {
        let r = record(json!({
            "energy": [{"charging": {"status": "Finished", "rate": 7.4, "remaining_time": 0}}]
        }));
        assert_eq!(SensorKind::ChargingPower.value(&r), Some(json!(0)));
        assert_eq!(SensorKind::ChargingTime.value(&r), None);
    }

    #[test]
    fn test_render() {
        let state = SensorKind::Mileage.render("VF1AAA", &sample(), true);
        assert_eq!(state.unique_id, "VF1AAA_mileage");
        assert_eq!(state.name, "Mileage");
        assert_eq!(state.platform, Platform::Sensor);
        assert_eq!(state.unit, Some("km"));
        assert_eq!(state.state_class, Some("total_increasing"));
        assert_eq!(state.state, json!(12034.5));
        assert!(state.available);

        let missing = SensorKind::Consumption.render("VF1AAA", &VehicleRecord::new(), false);
        assert_eq!(missing.state, Value::Null);
        assert!(!missing.available);
    }

    #[test]
    fn test_unique_suffixes() {
        let mut suffixes: Vec<_> = SensorKind::ALL
            .iter()
            .map(|k| k.description().suffix)
            .collect();
        suffixes.sort();
        suffixes.dedup();
        assert_eq!(suffixes.len(), SensorKind::ALL.len());
    }
}
