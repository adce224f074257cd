use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use common::types::Message;
use service::marketplace::domain::{NearbyListing, ServiceInput, ServiceListing};
use service::proximity::{Nearby, NearbyParams};

use crate::errors::ApiError;
use crate::extract::{CurrentUser, JsonBody, PathParam, QueryParams};
use crate::state::ServerState;

#[utoipa::path(post, path = "/service", tag = "service", security(("bearer" = [])), request_body = crate::openapi::ServiceRequest,
    responses((status = 201, description = "Listing created"), (status = 400, description = "Invalid request body", body = crate::openapi::ErrorResponse), (status = 404, description = "Worker not found")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(ctx): CurrentUser,
    JsonBody(input): JsonBody<ServiceInput>,
) -> Result<(StatusCode, Json<ServiceListing>), ApiError> {
    let listing = state.listings.create(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

#[utoipa::path(put, path = "/service/{id}", tag = "service", security(("bearer" = [])), request_body = crate::openapi::ServiceRequest,
    params(("id" = Uuid, Path, description = "Listing id")),
    responses((status = 200, description = "Listing updated"), (status = 403, description = "Owned by another worker"), (status = 404, description = "Service not found")))]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(ctx): CurrentUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(input): JsonBody<ServiceInput>,
) -> Result<Json<ServiceListing>, ApiError> {
    Ok(Json(state.listings.update(&ctx, id, input).await?))
}

#[utoipa::path(delete, path = "/service/{id}", tag = "service", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Listing id")),
    responses((status = 200, description = "Listing deleted"), (status = 403, description = "Owned by another worker"), (status = 404, description = "Service not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(ctx): CurrentUser,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Message>, ApiError> {
    state.listings.delete(&ctx, id).await?;
    Ok(Json(Message::new("Service deleted successfully")))
}

#[utoipa::path(get, path = "/service/worker/{workerId}", tag = "service",
    params(("workerId" = Uuid, Path, description = "Worker id")),
    responses((status = 200, description = "Listings of the worker"), (status = 404, description = "Worker not found")))]
pub async fn for_worker(
    State(state): State<ServerState>,
    PathParam(worker_id): PathParam<Uuid>,
) -> Result<Json<Vec<ServiceListing>>, ApiError> {
    Ok(Json(state.listings.for_worker(worker_id).await?))
}

#[utoipa::path(get, path = "/service/nearby", tag = "service", params(crate::openapi::NearbyQueryDoc),
    responses((status = 200, description = "Listings of nearby workers, closest first"), (status = 400, description = "Invalid query parameters", body = crate::openapi::ErrorResponse)))]
pub async fn nearby(
    State(state): State<ServerState>,
    QueryParams(params): QueryParams<NearbyParams>,
) -> Result<Json<Vec<Nearby<NearbyListing>>>, ApiError> {
    let query = params.into_query(state.default_max_distance_km)?;
    Ok(Json(state.listings.nearby(&query).await?))
}
