//! Number entities

use std::str::FromStr;

use psacc_core::lookup::{air_conditioning, charging};
use psacc_core::VehicleRecord;
use serde_json::json;
use tracing::info;

use crate::context::VehicleContext;
use crate::error::{EntityError, EntityResult};
use crate::state::{EntityState, Platform};

/// Cabin temperature used when none is given, in °C
pub const DEFAULT_CLIMATE_TEMPERATURE: f64 = 21.0;

/// Charge threshold assumed when the service reports none, in %
pub const DEFAULT_CHARGE_THRESHOLD: f64 = 100.0;

/// Allowed range of a number entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl NumberRange {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    ChargeThreshold,
    ClimateTemperature,
}

impl NumberKind {
    pub const ALL: [NumberKind; 2] = [NumberKind::ChargeThreshold, NumberKind::ClimateTemperature];

    pub fn key(&self) -> &'static str {
        match self {
            NumberKind::ChargeThreshold => "charge_threshold",
            NumberKind::ClimateTemperature => "climate_temperature",
        }
    }

    pub fn range(&self) -> NumberRange {
        match self {
            NumberKind::ChargeThreshold => NumberRange {
                min: 50.0,
                max: 100.0,
                step: 5.0,
            },
            NumberKind::ClimateTemperature => NumberRange {
                min: 16.0,
                max: 28.0,
                step: 0.5,
            },
        }
    }

    pub fn value(&self, record: &VehicleRecord) -> f64 {
        let (block, field, default) = match self {
            NumberKind::ChargeThreshold => {
                (charging(record), "charge_threshold", DEFAULT_CHARGE_THRESHOLD)
            }
            NumberKind::ClimateTemperature => (
                air_conditioning(record),
                "temperature",
                DEFAULT_CLIMATE_TEMPERATURE,
            ),
        };
        block
            .and_then(|b| b.get(field))
            .and_then(|v| v.as_f64())
            .unwrap_or(default)
    }

    pub fn render(&self, vin: &str, record: &VehicleRecord, available: bool) -> EntityState {
        let (suffix, name, unit, icon) = match self {
            NumberKind::ChargeThreshold => (
                "charge_threshold_number",
                "Charge threshold",
                "%",
                "mdi:battery",
            ),
            NumberKind::ClimateTemperature => (
                "climate_temperature",
                "Climate temperature",
                "°C",
                "mdi:thermometer",
            ),
        };
        let range = self.range();
        EntityState::new(Platform::Number, vin, suffix, self.key(), name, icon)
            .unit(Some(unit))
            .state(json!(self.value(record)))
            .available(available)
            .attribute("min", range.min)
            .attribute("max", range.max)
            .attribute("step", range.step)
    }

    /// Validate `value` against the range, then send it.
    ///
    /// The charge threshold is truncated to a whole percentage; a new
    /// climate temperature starts preconditioning at that temperature.
    pub async fn set_value(&self, ctx: &VehicleContext, vin: &str, value: f64) -> EntityResult<bool> {
        let range = self.range();
        if !range.contains(value) {
            return Err(EntityError::OutOfRange {
                key: self.key(),
                value,
                min: range.min,
                max: range.max,
            });
        }
        ctx.require_vehicle(vin)?;
        info!(vin = %vin, number = self.key(), value, "Setting value");

        let sent = match self {
            NumberKind::ChargeThreshold => {
                ctx.api.set_charge_threshold(vin, value.trunc() as u8).await
            }
            NumberKind::ClimateTemperature => ctx.api.start_climate(vin, value).await,
        };
        ctx.refresh.request_refresh();
        Ok(sent)
    }
}

impl FromStr for NumberKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| EntityError::UnknownEntity {
                platform: "number",
                key: s.to_string(),
            })
    }
}
