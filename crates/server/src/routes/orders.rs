use axum::{extract::State, Json};

use service::marketplace::domain::{OrderInput, OrderPlacement};

use crate::errors::ApiError;
use crate::extract::{CurrentUser, JsonBody};
use crate::state::ServerState;

#[utoipa::path(post, path = "/order", tag = "order", security(("bearer" = [])), request_body = crate::openapi::OrderRequest,
    responses((status = 200, description = "Order placed with a WhatsApp link to the worker"), (status = 403, description = "Not a client"), (status = 404, description = "Worker not found")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(ctx): CurrentUser,
    JsonBody(input): JsonBody<OrderInput>,
) -> Result<Json<OrderPlacement>, ApiError> {
    Ok(Json(state.orders.place(&ctx, input).await?))
}
