//! /vehicles/, /parts/ and the fixed tool listing

use super::{parse_id, payload, ApiResult, AppState, Payload};
use crate::entities::{Part, PartDraft, ToolListing, Vehicle, VehicleDraft, WriteMode};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

// ============================================================================
// VEHICLES
// ============================================================================

/// GET /vehicles/
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Vehicle>>> {
    Ok(Json(state.catalog.list_vehicles()?))
}

/// GET /vehicles/:id/
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vehicle>> {
    let id = parse_id("vehicle", &id)?;
    Ok(Json(state.catalog.get_vehicle(id)?))
}

/// POST /vehicles/
pub async fn create(
    State(state): State<AppState>,
    body: Payload<VehicleDraft>,
) -> ApiResult<(StatusCode, Json<Vehicle>)> {
    let vehicle = state.catalog.create_vehicle(payload(body)?)?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// PUT /vehicles/:id/
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Payload<VehicleDraft>,
) -> ApiResult<Json<Vehicle>> {
    let id = parse_id("vehicle", &id)?;
    Ok(Json(state.catalog.update_vehicle(id, payload(body)?, WriteMode::Full)?))
}

/// PATCH /vehicles/:id/
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Payload<VehicleDraft>,
) -> ApiResult<Json<Vehicle>> {
    let id = parse_id("vehicle", &id)?;
    Ok(Json(state.catalog.update_vehicle(id, payload(body)?, WriteMode::Partial)?))
}

/// DELETE /vehicles/:id/ - takes the vehicle's parts with it
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("vehicle", &id)?;
    state.catalog.delete_vehicle(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /vehicles/list_tools/
pub async fn list_tools(State(state): State<AppState>) -> Json<ToolListing> {
    Json(state.catalog.list_tools())
}

// ============================================================================
// PARTS
// ============================================================================

/// GET /parts/
pub async fn list_parts(State(state): State<AppState>) -> ApiResult<Json<Vec<Part>>> {
    Ok(Json(state.catalog.list_parts()?))
}

/// GET /parts/:id/
pub async fn retrieve_part(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Part>> {
    let id = parse_id("part", &id)?;
    Ok(Json(state.catalog.get_part(id)?))
}

/// POST /parts/
pub async fn create_part(
    State(state): State<AppState>,
    body: Payload<PartDraft>,
) -> ApiResult<(StatusCode, Json<Part>)> {
    let part = state.catalog.create_part(payload(body)?)?;
    Ok((StatusCode::CREATED, Json(part)))
}

/// PUT /parts/:id/
pub async fn replace_part(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Payload<PartDraft>,
) -> ApiResult<Json<Part>> {
    let id = parse_id("part", &id)?;
    Ok(Json(state.catalog.update_part(id, payload(body)?, WriteMode::Full)?))
}

/// PATCH /parts/:id/
pub async fn patch_part(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Payload<PartDraft>,
) -> ApiResult<Json<Part>> {
    let id = parse_id("part", &id)?;
    Ok(Json(state.catalog.update_part(id, payload(body)?, WriteMode::Partial)?))
}

/// DELETE /parts/:id/
pub async fn destroy_part(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("part", &id)?;
    state.catalog.delete_part(id)?;
    Ok(StatusCode::NO_CONTENT)
}
