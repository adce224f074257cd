//! Request extractors that reject with [`ApiError`] JSON bodies.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use axum_extra::extract::cookie::CookieJar;

use service::auth::{AuthContext, AuthError};

use crate::errors::ApiError;
use crate::state::ServerState;

/// Name of the cookie login sets and the extractor falls back to.
pub const AUTH_COOKIE: &str = "auth_token";

/// `axum::Json` with JSON error responses.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` with JSON error responses.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

/// `axum::extract::Query` with JSON error responses.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// The authenticated caller, from `Authorization: Bearer` or the auth cookie.
pub struct CurrentUser(pub AuthContext);

#[async_trait]
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(AuthError::MissingToken)?;
        let ctx = state.auth.authenticate(&token).map_err(|e| {
            tracing::debug!(path = %parts.uri.path(), error = %e, "token rejected");
            e
        })?;
        Ok(CurrentUser(ctx))
    }
}

/// Header wins over cookie; a header without the `Bearer ` prefix is passed
/// through as-is and fails verification.
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }
    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
