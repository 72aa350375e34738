//! HTTP API: routes, shared state and request helpers.

pub mod artifacts;
pub mod auth;
pub mod books;
pub mod error;
pub mod people;
pub mod vehicles;

use crate::catalog::{Catalog, CatalogError};
use crate::schema::ValidationErrors;
use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub const DEFAULT_LOGIN_URL: &str = "/accounts/login/";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    /// Where unauthenticated callers of HTML pages are sent
    pub login_url: Arc<str>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        AppState {
            catalog,
            login_url: Arc::from(DEFAULT_LOGIN_URL),
        }
    }

    pub fn with_login_url(mut self, login_url: &str) -> Self {
        self.login_url = Arc::from(login_url);
        self
    }
}

pub type ApiResult<T> = Result<T, CatalogError>;

/// JSON body that failed to parse is reported as a validation error
pub type Payload<T> = Result<Json<T>, JsonRejection>;

pub fn payload<T>(body: Payload<T>) -> ApiResult<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        CatalogError::Validation(ValidationErrors::single(
            "non_field_errors",
            rejection.body_text(),
        ))
    })
}

/// Path ids that are not positive integers cannot name a record
pub fn parse_id(entity: &'static str, raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CatalogError::not_found(entity, raw))
}

#[derive(Serialize)]
struct Health {
    success: bool,
    version: &'static str,
}

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(Health {
        success: true,
        version: crate::VERSION,
    })
}

/// Build the full router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // artifacts
        .route("/artifacts/", get(artifacts::list).post(artifacts::create))
        .route(
            "/artifacts/:id/",
            get(artifacts::retrieve)
                .put(artifacts::replace)
                .patch(artifacts::patch)
                .delete(artifacts::destroy),
        )
        // books
        .route("/books/", get(books::list).post(books::create))
        .route("/books/library/", get(books::library))
        .route(
            "/books/:id/",
            get(books::retrieve)
                .put(books::replace)
                .patch(books::patch)
                .delete(books::destroy),
        )
        // people
        .route("/people/", get(people::list))
        // vehicles & parts
        .route("/vehicles/", get(vehicles::list).post(vehicles::create))
        .route("/vehicles/list_tools/", get(vehicles::list_tools))
        .route(
            "/vehicles/:id/",
            get(vehicles::retrieve)
                .put(vehicles::replace)
                .patch(vehicles::patch)
                .delete(vehicles::destroy),
        )
        .route("/parts/", get(vehicles::list_parts).post(vehicles::create_part))
        .route(
            "/parts/:id/",
            get(vehicles::retrieve_part)
                .put(vehicles::replace_part)
                .patch(vehicles::patch_part)
                .delete(vehicles::destroy_part),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
