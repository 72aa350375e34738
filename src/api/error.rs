//! Error → HTTP response mapping.

use crate::catalog::CatalogError;
use crate::schema::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

/// Error payload shared by every JSON endpoint
#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    kind: &'static str,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a ValidationErrors>,
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Unauthenticated => StatusCode::UNAUTHORIZED,
            CatalogError::Forbidden { .. } => StatusCode::FORBIDDEN,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Validation(_) => "validation",
            CatalogError::Unauthenticated | CatalogError::Forbidden { .. } => "authorization",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::Store(_) => "internal",
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let message = match &self {
            CatalogError::Store(e) => {
                error!(error = %e, "storage failure");
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };

        let fields = match &self {
            CatalogError::Validation(errors) => Some(errors),
            _ => None,
        };

        let body = ErrorBody {
            success: false,
            kind: self.kind(),
            error: message,
            fields,
        };

        (self.status(), Json(body)).into_response()
    }
}
