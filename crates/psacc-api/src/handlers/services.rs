//! Command services
//!
//! Each service validates its parameters before anything is sent; a
//! rejected call never reaches the remote service. Commands that change
//! vehicle state are followed by a refresh request whether or not the
//! remote accepted them.

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use psacc_core::RefreshTrigger;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::coerce;
use crate::error::ApiError;
use crate::state::AppState;

/// Registered command services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    SetChargeThreshold,
    SetChargeSchedule,
    StartClimate,
    StopClimate,
    Horn,
    Lights,
    Wakeup,
}

impl Service {
    pub const ALL: [Service; 7] = [
        Service::SetChargeThreshold,
        Service::SetChargeSchedule,
        Service::StartClimate,
        Service::StopClimate,
        Service::Horn,
        Service::Lights,
        Service::Wakeup,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Service::SetChargeThreshold => "set_charge_threshold",
            Service::SetChargeSchedule => "set_charge_schedule",
            Service::StartClimate => "start_climate",
            Service::StopClimate => "stop_climate",
            Service::Horn => "horn",
            Service::Lights => "lights",
            Service::Wakeup => "wakeup",
        }
    }

    /// Horn and lights leave the cached state unchanged
    pub fn refreshes(&self) -> bool {
        !matches!(self, Service::Horn | Service::Lights)
    }
}

impl FromStr for Service {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.name() == s)
            .ok_or_else(|| ApiError::NotFound(format!("Service not found: {}", s)))
    }
}

// =============================================================================
// Parameter Schemas
// =============================================================================

fn default_temperature() -> f64 {
    21.0
}

fn default_count() -> i64 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChargeThresholdParams {
    #[validate(length(min = 1))]
    pub vin: String,
    #[serde(deserialize_with = "coerce::int")]
    #[validate(range(min = 0, max = 100))]
    pub threshold: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChargeScheduleParams {
    #[validate(length(min = 1))]
    pub vin: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClimateParams {
    #[validate(length(min = 1))]
    pub vin: String,
    #[serde(default = "default_temperature", deserialize_with = "coerce::float")]
    #[validate(range(min = 16.0, max = 28.0))]
    pub temperature: f64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CountParams {
    #[validate(length(min = 1))]
    pub vin: String,
    #[serde(default = "default_count", deserialize_with = "coerce::int")]
    #[validate(range(min = 1, max = 5))]
    pub count: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VinParams {
    #[validate(length(min = 1))]
    pub vin: String,
}

fn parse<T: DeserializeOwned + Validate>(body: Value) -> Result<T, ApiError> {
    let params: T = serde_json::from_value(body)?;
    params.validate()?;
    Ok(params)
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub service: &'static str,
    pub vin: String,
    /// Whether the remote service accepted the command
    pub success: bool,
    pub refresh_requested: bool,
}

#[derive(Serialize)]
pub struct ServicesResponse {
    pub items: Vec<&'static str>,
}

pub async fn list_services() -> Json<ServicesResponse> {
    Json(ServicesResponse {
        items: Service::ALL.iter().map(Service::name).collect(),
    })
}

pub async fn call_service(
    State(state): State<AppState>,
    Path(service): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ServiceResponse>, ApiError> {
    let service: Service = service.parse()?;
    let Json(body) = body?;
    let api = state.api();

    let (vin, success) = match service {
        Service::SetChargeThreshold => {
            let params: ChargeThresholdParams = parse(body)?;
            // Range-checked to 0..=100 above
            let threshold = params.threshold as u8;
            let ok = api.set_charge_threshold(&params.vin, threshold).await;
            (params.vin, ok)
        }
        Service::SetChargeSchedule => {
            let params: ChargeScheduleParams = parse(body)?;
            let ok = api
                .set_charge_schedule(&params.vin, &params.start_time, &params.end_time)
                .await;
            (params.vin, ok)
        }
        Service::StartClimate => {
            let params: ClimateParams = parse(body)?;
            let ok = api.start_climate(&params.vin, params.temperature).await;
            (params.vin, ok)
        }
        Service::StopClimate => {
            let params: VinParams = parse(body)?;
            let ok = api.stop_climate(&params.vin).await;
            (params.vin, ok)
        }
        Service::Horn => {
            let params: CountParams = parse(body)?;
            let ok = api.horn(&params.vin, params.count as u8).await;
            (params.vin, ok)
        }
        Service::Lights => {
            let params: CountParams = parse(body)?;
            let ok = api.flash_lights(&params.vin, params.count as u8).await;
            (params.vin, ok)
        }
        Service::Wakeup => {
            let params: VinParams = parse(body)?;
            let ok = api.wakeup(&params.vin).await;
            (params.vin, ok)
        }
    };

    let refresh_requested = service.refreshes();
    if refresh_requested {
        state.coordinator().request_refresh();
    }
    info!(service = service.name(), vin = %vin, success, "Service called");

    Ok(Json(ServiceResponse {
        service: service.name(),
        vin,
        success,
        refresh_requested,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_names_round_trip() {
        for service in Service::ALL {
            assert_eq!(service.name().parse::<Service>().unwrap(), service);
        }
        assert!(matches!(
            "open_sunroof".parse::<Service>(),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_threshold_schema() {
        let params: ChargeThresholdParams =
            parse(json!({"vin": "VF1AAA", "threshold": "80"})).unwrap();
        assert_eq!(params.threshold, 80);

        assert!(parse::<ChargeThresholdParams>(json!({"vin": "VF1AAA", "threshold": 101})).is_err());
        assert!(parse::<ChargeThresholdParams>(json!({"vin": "VF1AAA", "threshold": -1})).is_err());
        assert!(parse::<ChargeThresholdParams>(json!({"vin": "VF1AAA"})).is_err());
        assert!(parse::<ChargeThresholdParams>(json!({"threshold": 80})).is_err());
    }

    #[test]
    fn test_climate_schema_defaults_and_bounds() {
        let params: ClimateParams = parse(json!({"vin": "VF1AAA"})).unwrap();
        assert_eq!(params.temperature, 21.0);

        let params: ClimateParams = parse(json!({"vin": "VF1AAA", "temperature": "19.5"})).unwrap();
        assert_eq!(params.temperature, 19.5);

        assert!(parse::<ClimateParams>(json!({"vin": "VF1AAA", "temperature": 15.9})).is_err());
        assert!(parse::<ClimateParams>(json!({"vin": "VF1AAA", "temperature": 28.1})).is_err());
        assert!(parse::<ClimateParams>(json!({"vin": "VF1AAA", "temperature": null})).is_err());
    }

    #[test]
    fn test_count_schema() {
        let params: CountParams = parse(json!({"vin": "VF1AAA"})).unwrap();
        assert_eq!(params.count, 1);
        assert!(parse::<CountParams>(json!({"vin": "VF1AAA", "count": 0})).is_err());
        assert!(parse::<CountParams>(json!({"vin": "VF1AAA", "count": 6})).is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(parse::<VinParams>(json!({"vin": "VF1AAA", "force": true})).is_err());
        assert!(parse::<VinParams>(json!({"vin": 42})).is_err());
        assert!(parse::<VinParams>(json!({"vin": ""})).is_err());
    }

    #[test]
    fn test_refresh_policy() {
        assert!(Service::Wakeup.refreshes());
        assert!(Service::SetChargeSchedule.refreshes());
        assert!(!Service::Horn.refreshes());
        assert!(!Service::Lights.refreshes());
    }
}
