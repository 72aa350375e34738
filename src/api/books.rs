//! /books/ - CRUD gated by the access policy, plus the library page

use super::auth::login_redirect;
use super::{parse_id, payload, ApiResult, AppState, Payload};
use crate::access::Caller;
use crate::catalog::CatalogError;
use crate::entities::{Book, BookDraft, WriteMode};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};

pub const LIBRARY_PATH: &str = "/books/library/";

const LIBRARY_PAGE: &str = include_str!("../../web/library.html");

/// GET /books/
pub async fn list(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(state.catalog.list_books(&caller)?))
}

/// GET /books/:id/
pub async fn retrieve(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Book>> {
    let id = parse_id("book", &id)?;
    Ok(Json(state.catalog.get_book(&caller, id)?))
}

/// POST /books/
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    body: Payload<BookDraft>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let book = state.catalog.create_book(&caller, payload(body)?)?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /books/:id/
pub async fn replace(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Payload<BookDraft>,
) -> ApiResult<Json<Book>> {
    update(state, &caller, &id, body, WriteMode::Full)
}

/// PATCH /books/:id/
pub async fn patch(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Payload<BookDraft>,
) -> ApiResult<Json<Book>> {
    update(state, &caller, &id, body, WriteMode::Partial)
}

fn update(
    state: AppState,
    caller: &Caller,
    id: &str,
    body: Payload<BookDraft>,
    mode: WriteMode,
) -> ApiResult<Json<Book>> {
    let id = parse_id("book", id)?;
    Ok(Json(state.catalog.update_book(caller, id, payload(body)?, mode)?))
}

/// DELETE /books/:id/
pub async fn destroy(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("book", &id)?;
    state.catalog.delete_book(&caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /books/library/ - HTML page for any signed-in caller
pub async fn library(State(state): State<AppState>, caller: Caller) -> Response {
    match state.catalog.library_access(&caller) {
        Ok(()) => Html(LIBRARY_PAGE).into_response(),
        Err(CatalogError::Unauthenticated) => login_redirect(&state.login_url, LIBRARY_PATH),
        Err(other) => other.into_response(),
    }
}
