//! /artifacts/ - open CRUD

use super::{parse_id, payload, ApiResult, AppState, Payload};
use crate::entities::{Artifact, ArtifactDraft, WriteMode};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

/// GET /artifacts/
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Artifact>>> {
    Ok(Json(state.catalog.list_artifacts()?))
}

/// GET /artifacts/:id/
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Artifact>> {
    let id = parse_id("artifact", &id)?;
    Ok(Json(state.catalog.get_artifact(id)?))
}

/// POST /artifacts/
pub async fn create(
    State(state): State<AppState>,
    body: Payload<ArtifactDraft>,
) -> ApiResult<(StatusCode, Json<Artifact>)> {
    let artifact = state.catalog.create_artifact(payload(body)?)?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

/// PUT /artifacts/:id/
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Payload<ArtifactDraft>,
) -> ApiResult<Json<Artifact>> {
    update(state, &id, body, WriteMode::Full)
}

/// PATCH /artifacts/:id/
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Payload<ArtifactDraft>,
) -> ApiResult<Json<Artifact>> {
    update(state, &id, body, WriteMode::Partial)
}

fn update(
    state: AppState,
    id: &str,
    body: Payload<ArtifactDraft>,
    mode: WriteMode,
) -> ApiResult<Json<Artifact>> {
    let id = parse_id("artifact", id)?;
    Ok(Json(state.catalog.update_artifact(id, payload(body)?, mode)?))
}

/// DELETE /artifacts/:id/
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("artifact", &id)?;
    state.catalog.delete_artifact(id)?;
    Ok(StatusCode::NO_CONTENT)
}
