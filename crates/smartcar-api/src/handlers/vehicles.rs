//! Vehicle handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use smartcar_core::{
    translator, DoorState, EnergyLevel, EnergyType, EngineActionResult, VehicleInfo,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /api/v1/vehicles/{id}/engine`
#[derive(Debug, Deserialize)]
pub struct EngineActionRequest {
    /// "START" or "STOP"
    #[serde(default)]
    pub action: Option<String>,
}

/// GET /api/v1/vehicles/{id}
/// Vehicle identity and body style
pub async fn get_vehicle_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleInfo>, ApiError> {
    let info = translator::get_vehicle_info(state.gateway(), &id)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(info))
}

/// GET /api/v1/vehicles/{id}/doors
/// Lock state of every door, in upstream order
pub async fn get_security_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<DoorState>>, ApiError> {
    let doors = translator::get_security_status(state.gateway(), &id)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(doors))
}

/// GET /api/v1/vehicles/{id}/{fuel|battery}
/// Fuel tank or battery level
///
/// Only `fuel` and `battery` are routable; anything else is a 404 and never
/// reaches the upstream.
pub async fn get_energy_level(
    State(state): State<AppState>,
    Path((id, energy_type)): Path<(String, String)>,
) -> Result<Json<EnergyLevel>, ApiError> {
    let energy_type: EnergyType = energy_type
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Unknown energy type: {}", energy_type)))?;

    let level = translator::get_energy_data(state.gateway(), &id, energy_type.as_str())
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(level))
}

/// POST /api/v1/vehicles/{id}/engine
/// Start or stop the engine
///
/// A missing or unreadable body is treated as an invalid action rather than
/// a framework rejection, so the response keeps the `{error}` shape.
pub async fn control_engine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<EngineActionRequest>, JsonRejection>,
) -> Result<Json<EngineActionResult>, ApiError> {
    let action = match body {
        Ok(Json(request)) => request.action.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(%rejection, "Unreadable engine action body");
            String::new()
        }
    };

    let result = translator::control_engine(state.gateway(), &id, &action)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(result))
}
