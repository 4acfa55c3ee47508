//! Entity views and entity actions for one vehicle

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use psacc_entities::{
    vehicle_entities, ButtonKind, DeviceInfo, EntityState, NumberKind, SelectKind, SwitchKind,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct VehicleEntitiesResponse {
    pub vin: String,
    pub device: DeviceInfo,
    pub entities: Vec<EntityState>,
}

/// Result of an entity action
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub vin: String,
    pub entity: String,
    /// Whether the remote service accepted the command
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct NumberRequest {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub option: String,
}

pub async fn list_entities(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<VehicleEntitiesResponse>, ApiError> {
    state.require_vehicle(&vin)?;

    let ctx = state.entities();
    let device = DeviceInfo::from_record(&vin, &ctx.record(&vin));
    let entities = vehicle_entities(ctx, &vin);

    Ok(Json(VehicleEntitiesResponse {
        vin,
        device,
        entities,
    }))
}

pub async fn switch_action(
    State(state): State<AppState>,
    Path((vin, switch, action)): Path<(String, String, String)>,
) -> Result<Json<ActionResponse>, ApiError> {
    let kind: SwitchKind = switch.parse()?;
    let on = match action.as_str() {
        "on" => true,
        "off" => false,
        other => {
            return Err(ApiError::BadRequest(format!(
                "Invalid switch action: {} (expected on or off)",
                other
            )))
        }
    };

    let success = kind.set(state.entities(), &vin, on).await?;
    Ok(Json(ActionResponse {
        vin,
        entity: switch,
        success,
    }))
}

pub async fn press_button(
    State(state): State<AppState>,
    Path((vin, button)): Path<(String, String)>,
) -> Result<Json<ActionResponse>, ApiError> {
    let kind: ButtonKind = button.parse()?;
    let success = kind.press(state.entities(), &vin).await?;
    Ok(Json(ActionResponse {
        vin,
        entity: button,
        success,
    }))
}

pub async fn set_number(
    State(state): State<AppState>,
    Path((vin, number)): Path<(String, String)>,
    request: Result<Json<NumberRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let Json(request) = request?;
    let kind: NumberKind = number.parse()?;
    let success = kind.set_value(state.entities(), &vin, request.value).await?;
    Ok(Json(ActionResponse {
        vin,
        entity: number,
        success,
    }))
}

pub async fn select_option(
    State(state): State<AppState>,
    Path((vin, select)): Path<(String, String)>,
    request: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let Json(request) = request?;
    let kind: SelectKind = select.parse()?;
    let success = kind
        .select_option(state.entities(), &vin, &request.option)
        .await?;
    Ok(Json(ActionResponse {
        vin,
        entity: select,
        success,
    }))
}
