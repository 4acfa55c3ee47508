//! Binary sensor entities

use psacc_core::lookup::{is_charging, is_climate_active, is_plugged, path};
use psacc_core::VehicleRecord;
use serde_json::Value;

use crate::state::{EntityState, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarySensorKind {
    Charging,
    Plugged,
    DoorsLocked,
    DriverDoor,
    PassengerDoor,
    RearLeftDoor,
    RearRightDoor,
    Hood,
    Trunk,
    Climate,
}

impl BinarySensorKind {
    pub const ALL: [BinarySensorKind; 10] = [
        BinarySensorKind::Charging,
        BinarySensorKind::Plugged,
        BinarySensorKind::DoorsLocked,
        BinarySensorKind::DriverDoor,
        BinarySensorKind::PassengerDoor,
        BinarySensorKind::RearLeftDoor,
        BinarySensorKind::RearRightDoor,
        BinarySensorKind::Hood,
        BinarySensorKind::Trunk,
        BinarySensorKind::Climate,
    ];

    /// (unique-id suffix, name, device class, icon)
    fn meta(&self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Self::Charging => ("charging", "Charging", "battery_charging", "mdi:ev-station"),
            Self::Plugged => ("plugged", "Plugged", "plug", "mdi:power-plug"),
            Self::DoorsLocked => ("doors_locked", "Doors locked", "lock", "mdi:car-door-lock"),
            Self::DriverDoor => ("door_driver", "Driver door", "door", "mdi:car-door"),
            Self::PassengerDoor => ("door_passenger", "Passenger door", "door", "mdi:car-door"),
            Self::RearLeftDoor => ("door_rear_left", "Rear left door", "door", "mdi:car-door"),
            Self::RearRightDoor => ("door_rear_right", "Rear right door", "door", "mdi:car-door"),
            Self::Hood => ("hood", "Hood", "opening", "mdi:car-door"),
            Self::Trunk => ("trunk", "Trunk", "opening", "mdi:car-door"),
            Self::Climate => ("climate", "Climate", "running", "mdi:air-conditioner"),
        }
    }

    pub fn is_on(&self, record: &VehicleRecord) -> bool {
        match self {
            Self::Charging => is_charging(record),
            Self::Plugged => is_plugged(record),
            Self::DoorsLocked => doors_locked(record),
            Self::DriverDoor => opening_open(record, "driver"),
            Self::PassengerDoor => opening_open(record, "passenger"),
            Self::RearLeftDoor => opening_open(record, "rear_left"),
            Self::RearRightDoor => opening_open(record, "rear_right"),
            Self::Hood => opening_open(record, "hood"),
            Self::Trunk => opening_open(record, "trunk"),
            Self::Climate => is_climate_active(record),
        }
    }

    pub fn render(&self, vin: &str, record: &VehicleRecord, available: bool) -> EntityState {
        let (suffix, name, device_class, icon) = self.meta();
        EntityState::new(Platform::BinarySensor, vin, suffix, suffix, name, icon)
            .device_class(Some(device_class))
            .state(self.is_on(record))
            .available(available)
    }
}

/// `doorsState.lockedState` reports either one state or a list of states
fn doors_locked(record: &VehicleRecord) -> bool {
    let is_locked = |v: &Value| matches!(v.as_str(), Some("Locked") | Some("SuperLocked"));
    match path(record, &["doorsState", "lockedState"]) {
        Some(Value::Array(states)) => states.iter().any(is_locked),
        Some(state) => is_locked(state),
        None => false,
    }
}

fn opening_open(record: &VehicleRecord, name: &str) -> bool {
    path(record, &["doors", name]).and_then(Value::as_str) == Some("Open")
}
