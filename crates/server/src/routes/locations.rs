use axum::{extract::State, Json};
use serde::Serialize;

use service::marketplace::domain::{Location, LocationInput, LocationWithUser};
use service::proximity::{Nearby, NearbyParams};

use crate::errors::ApiError;
use crate::extract::{CurrentUser, JsonBody, QueryParams};
use crate::state::ServerState;

#[derive(Serialize)]
pub struct UpsertOutput {
    pub message: &'static str,
    pub location: Location,
}

#[utoipa::path(post, path = "/location/upsert", tag = "location", security(("bearer" = [])), request_body = crate::openapi::LocationRequest,
    responses((status = 200, description = "Location stored"), (status = 400, description = "Out of range or unresolvable", body = crate::openapi::ErrorResponse), (status = 502, description = "Geocoder unavailable", body = crate::openapi::ErrorResponse)))]
pub async fn upsert(
    State(state): State<ServerState>,
    CurrentUser(ctx): CurrentUser,
    JsonBody(input): JsonBody<LocationInput>,
) -> Result<Json<UpsertOutput>, ApiError> {
    let location = state.locations.upsert(&ctx, input).await?;
    Ok(Json(UpsertOutput { message: "Location updated successfully", location }))
}

#[utoipa::path(get, path = "/location/nearby", tag = "location", params(crate::openapi::NearbyQueryDoc),
    responses((status = 200, description = "Stored locations within range, closest first"), (status = 400, description = "Invalid query parameters", body = crate::openapi::ErrorResponse)))]
pub async fn nearby(
    State(state): State<ServerState>,
    QueryParams(params): QueryParams<NearbyParams>,
) -> Result<Json<Vec<Nearby<LocationWithUser>>>, ApiError> {
    let query = params.into_query(state.default_max_distance_km)?;
    Ok(Json(state.locations.nearby(&query).await?))
}
