//! /people/ - read-only listing

use super::{ApiResult, AppState};
use crate::entities::PeopleListing;
use axum::{extract::State, response::Json};

/// GET /people/ - `{"people": [{first, last, title}, ...]}`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<PeopleListing>> {
    Ok(Json(state.catalog.list_people()?))
}
