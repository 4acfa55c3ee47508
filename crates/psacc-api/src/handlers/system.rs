//! Refresh, status and runtime options

use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use psacc_coordinator::{
    update_interval_from_minutes, CoordinatorStatus, MAX_UPDATE_INTERVAL_MINUTES,
    MIN_UPDATE_INTERVAL_MINUTES,
};
use psacc_core::RefreshTrigger;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    /// Run the cycle inline and report its outcome
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub requested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

pub async fn refresh(
    State(state): State<AppState>,
    query: Result<Query<RefreshQuery>, QueryRejection>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let Query(query) = query?;
    if query.wait {
        state.coordinator().refresh().await?;
        return Ok(Json(RefreshResponse {
            requested: true,
            completed: Some(true),
        }));
    }

    state.coordinator().request_refresh();
    Ok(Json(RefreshResponse {
        requested: true,
        completed: None,
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<CoordinatorStatus> {
    Json(state.coordinator().status())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OptionsRequest {
    /// Polling period in minutes
    #[validate(range(min = MIN_UPDATE_INTERVAL_MINUTES, max = MAX_UPDATE_INTERVAL_MINUTES))]
    pub update_interval: u64,
}

pub async fn update_options(
    State(state): State<AppState>,
    request: Result<Json<OptionsRequest>, JsonRejection>,
) -> Result<Json<CoordinatorStatus>, ApiError> {
    let Json(request) = request?;
    request.validate()?;

    let interval: Duration = update_interval_from_minutes(request.update_interval);
    state.coordinator().set_update_interval(interval);
    Ok(Json(state.coordinator().status()))
}
