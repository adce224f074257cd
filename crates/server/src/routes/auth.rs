use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use service::auth::domain::{AuthSession, LoginInput, RegisterInput, SessionUser};
use service::auth::Role;
use service::marketplace::domain::Worker;

use crate::errors::ApiError;
use crate::extract::{CurrentUser, JsonBody, AUTH_COOKIE};
use crate::state::ServerState;

#[derive(Serialize)]
pub struct SessionOutput {
    pub message: &'static str,
    pub token: String,
    pub user: SessionUser,
}

impl SessionOutput {
    fn new(message: &'static str, session: AuthSession) -> Self {
        Self { message, token: session.token, user: session.user }
    }
}

#[derive(Serialize)]
pub struct UpgradeOutput {
    pub message: &'static str,
    pub worker: Worker,
    pub token: String,
}

fn auth_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered", body = crate::openapi::SessionResponse), (status = 400, description = "Invalid input or email taken", body = crate::openapi::ErrorResponse)))]
pub async fn register(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> Result<(StatusCode, Json<SessionOutput>), ApiError> {
    let session = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(SessionOutput::new("User registered successfully", session))))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in; also sets the auth_token cookie", body = crate::openapi::SessionResponse), (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorResponse)))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginInput>,
) -> Result<(CookieJar, Json<SessionOutput>), ApiError> {
    let session = state.auth.login(input).await?;
    let jar = jar.add(auth_cookie(session.token.clone()));
    Ok((jar, Json(SessionOutput::new("Login successful", session))))
}

#[utoipa::path(post, path = "/auth/upgrade-worker", tag = "auth", security(("bearer" = [])),
    responses((status = 200, description = "Now a worker; carries a fresh token", body = crate::openapi::UpgradeResponse), (status = 400, description = "Invalid role or user", body = crate::openapi::ErrorResponse), (status = 403, description = "Not a client", body = crate::openapi::ErrorResponse)))]
pub async fn upgrade_worker(
    State(state): State<ServerState>,
    jar: CookieJar,
    CurrentUser(ctx): CurrentUser,
) -> Result<(CookieJar, Json<UpgradeOutput>), ApiError> {
    let worker = state.workers.upgrade(&ctx).await?;
    let token = state.auth.issue_token(ctx.user_id, Role::Worker)?;
    // Refresh the cookie so cookie sessions carry the WORKER role.
    let jar = if jar.get(AUTH_COOKIE).is_some() { jar.add(auth_cookie(token.clone())) } else { jar };
    Ok((jar, Json(UpgradeOutput { message: "Upgraded to WORKER", worker, token })))
}
