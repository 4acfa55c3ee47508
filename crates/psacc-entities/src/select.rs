//! Select entities

use std::str::FromStr;

use psacc_core::lookup::{charging, is_plugged, str_field};
use psacc_core::VehicleRecord;
use serde_json::json;
use tracing::warn;

use crate::context::VehicleContext;
use crate::error::{EntityError, EntityResult};
use crate::state::{EntityState, Platform};

/// Charge mode options, in display order
pub const CHARGE_MODE_OPTIONS: [&str; 3] = ["immediate", "scheduled", "economic"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    ChargeMode,
}

impl SelectKind {
    pub const ALL: [SelectKind; 1] = [SelectKind::ChargeMode];

    pub fn key(&self) -> &'static str {
        match self {
            SelectKind::ChargeMode => "charge_mode",
        }
    }

    pub fn options(&self) -> &'static [&'static str] {
        match self {
            SelectKind::ChargeMode => &CHARGE_MODE_OPTIONS,
        }
    }

    /// Current option; unknown or missing modes read as `immediate`
    pub fn current_option(&self, record: &VehicleRecord) -> &'static str {
        match self {
            SelectKind::ChargeMode => match str_field(charging(record), "mode") {
                Some("schedule") | Some("scheduled") => "scheduled",
                Some("eco") | Some("economic") => "economic",
                _ => "immediate",
            },
        }
    }

    pub fn is_available(&self, record: &VehicleRecord, vehicle_available: bool) -> bool {
        vehicle_available && is_plugged(record)
    }

    pub fn render(&self, vin: &str, record: &VehicleRecord, available: bool) -> EntityState {
        EntityState::new(
            Platform::Select,
            vin,
            "charge_mode",
            self.key(),
            "Charge mode",
            "mdi:ev-station",
        )
        .state(self.current_option(record))
        .available(self.is_available(record, available))
        .attribute("options", json!(self.options()))
    }

    /// Accept an option and request a refresh.
    ///
    /// The remote service has no charge-mode setter, so nothing is sent and
    /// the result is always `false`.
    pub async fn select_option(
        &self,
        ctx: &VehicleContext,
        vin: &str,
        option: &str,
    ) -> EntityResult<bool> {
        let api_mode = match option {
            "immediate" => "now",
            "scheduled" => "schedule",
            "economic" => "eco",
            _ => {
                return Err(EntityError::InvalidOption {
                    key: self.key(),
                    option: option.to_string(),
                })
            }
        };
        ctx.require_vehicle(vin)?;

        warn!(
            vin = %vin,
            option,
            api_mode,
            "Setting the charge mode is not supported by the remote service"
        );
        ctx.refresh.request_refresh();
        Ok(false)
    }
}

impl FromStr for SelectKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| EntityError::UnknownEntity {
                platform: "select",
                key: s.to_string(),
            })
    }
}
