//! Caller identity from trusted upstream headers.
//!
//! Authentication happens in front of this service; the proxy forwards the
//! user name and role list it established.

use crate::access::Caller;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

pub const USER_HEADER: &str = "x-remote-user";
pub const ROLES_HEADER: &str = "x-remote-roles";

pub fn caller_from_headers(headers: &HeaderMap) -> Caller {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    Caller::from_identity(header(USER_HEADER), header(ROLES_HEADER))
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(caller_from_headers(&parts.headers))
    }
}

/// 302 to the login page, remembering where the caller was headed
pub fn login_redirect(login_url: &str, next: &str) -> Response {
    let location = format!("{}?next={}", login_url, urlencoding::encode(next));
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
