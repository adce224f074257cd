use axum::{extract::State, Json};
use uuid::Uuid;

use service::marketplace::domain::{LocatedWorker, Worker, WorkerProfile, WorkerProfileInput};
use service::proximity::{Nearby, NearbyParams};

use crate::errors::ApiError;
use crate::extract::{CurrentUser, JsonBody, PathParam, QueryParams};
use crate::state::ServerState;

#[utoipa::path(get, path = "/worker/profile", tag = "worker", security(("bearer" = [])),
    responses((status = 200, description = "Own worker profile"), (status = 403, description = "Not a worker"), (status = 404, description = "Worker not found")))]
pub async fn my_profile(
    State(state): State<ServerState>,
    CurrentUser(ctx): CurrentUser,
) -> Result<Json<WorkerProfile>, ApiError> {
    Ok(Json(state.workers.my_profile(&ctx).await?))
}

#[utoipa::path(put, path = "/worker/profile", tag = "worker", security(("bearer" = [])), request_body = crate::openapi::WorkerProfileRequest,
    responses((status = 200, description = "Updated worker"), (status = 400, description = "Invalid request body", body = crate::openapi::ErrorResponse)))]
pub async fn update_profile(
    State(state): State<ServerState>,
    CurrentUser(ctx): CurrentUser,
    JsonBody(input): JsonBody<WorkerProfileInput>,
) -> Result<Json<Worker>, ApiError> {
    Ok(Json(state.workers.update_profile(&ctx, input).await?))
}

#[utoipa::path(get, path = "/worker/{id}", tag = "worker", params(("id" = Uuid, Path, description = "Worker id")),
    responses((status = 200, description = "Public worker profile"), (status = 404, description = "Worker not found", body = crate::openapi::ErrorResponse)))]
pub async fn get_worker(
    State(state): State<ServerState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<WorkerProfile>, ApiError> {
    Ok(Json(state.workers.get(id).await?))
}

#[utoipa::path(get, path = "/worker/nearby", tag = "worker", params(crate::openapi::NearbyQueryDoc),
    responses((status = 200, description = "Workers within range, closest first"), (status = 400, description = "Invalid query parameters", body = crate::openapi::ErrorResponse)))]
pub async fn nearby(
    State(state): State<ServerState>,
    QueryParams(params): QueryParams<NearbyParams>,
) -> Result<Json<Vec<Nearby<LocatedWorker>>>, ApiError> {
    let query = params.into_query(state.default_max_distance_km)?;
    Ok(Json(state.workers.nearby(&query).await?))
}
