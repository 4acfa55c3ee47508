//! Switch entities

use std::str::FromStr;

use psacc_core::lookup::{is_charging, is_climate_active, is_plugged};
use psacc_core::VehicleRecord;
use tracing::info;

use crate::context::VehicleContext;
use crate::error::{EntityError, EntityResult};
use crate::number::DEFAULT_CLIMATE_TEMPERATURE;
use crate::state::{EntityState, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    Charging,
    Climate,
}

impl SwitchKind {
    pub const ALL: [SwitchKind; 2] = [SwitchKind::Charging, SwitchKind::Climate];

    pub fn key(&self) -> &'static str {
        match self {
            SwitchKind::Charging => "charging",
            SwitchKind::Climate => "climate",
        }
    }

    pub fn is_on(&self, record: &VehicleRecord) -> bool {
        match self {
            SwitchKind::Charging => is_charging(record),
            SwitchKind::Climate => is_climate_active(record),
        }
    }

    /// Charging can only be toggled with the cable plugged in
    pub fn is_available(&self, record: &VehicleRecord, vehicle_available: bool) -> bool {
        match self {
            SwitchKind::Charging => vehicle_available && is_plugged(record),
            SwitchKind::Climate => vehicle_available,
        }
    }

    pub fn render(&self, vin: &str, record: &VehicleRecord, available: bool) -> EntityState {
        let (suffix, name, icon) = match self {
            SwitchKind::Charging => ("charging_switch", "Charging", "mdi:ev-station"),
            SwitchKind::Climate => ("climate_switch", "Climate", "mdi:air-conditioner"),
        };
        EntityState::new(Platform::Switch, vin, suffix, self.key(), name, icon)
            .state(self.is_on(record))
            .available(self.is_available(record, available))
    }

    /// Start charging, or start climate at the default temperature
    pub async fn turn_on(&self, ctx: &VehicleContext, vin: &str) -> EntityResult<bool> {
        self.set(ctx, vin, true).await
    }

    pub async fn turn_off(&self, ctx: &VehicleContext, vin: &str) -> EntityResult<bool> {
        self.set(ctx, vin, false).await
    }

    pub async fn set(&self, ctx: &VehicleContext, vin: &str, on: bool) -> EntityResult<bool> {
        ctx.require_vehicle(vin)?;
        info!(vin = %vin, switch = self.key(), on, "Switching");

        let sent = match (self, on) {
            (SwitchKind::Charging, true) => ctx.api.start_charge(vin).await,
            (SwitchKind::Charging, false) => ctx.api.stop_charge(vin).await,
            (SwitchKind::Climate, true) => {
                ctx.api.start_climate(vin, DEFAULT_CLIMATE_TEMPERATURE).await
            }
            (SwitchKind::Climate, false) => ctx.api.stop_climate(vin).await,
        };
        ctx.refresh.request_refresh();
        Ok(sent)
    }
}

impl FromStr for SwitchKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| EntityError::UnknownEntity {
                platform: "switch",
                key: s.to_string(),
            })
    }
}
