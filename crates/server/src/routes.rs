pub mod auth;
pub mod listings;
pub mod locations;
pub mod orders;
pub mod workers;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{Health, Welcome};

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Welcome message")))]
pub async fn root() -> Json<Welcome> {
    Json(Welcome::default())
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let body = common::metrics::render().map_err(|e| {
        tracing::error!(error = %e, "metrics encoding failed");
        ApiError::internal()
    })?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

/// Build the full application router: public pages, resource routes and docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/upgrade-worker", post(auth::upgrade_worker));

    let worker_routes = Router::new()
        .route("/profile", get(workers::my_profile).put(workers::update_profile))
        .route("/nearby", get(workers::nearby))
        .route("/:id", get(workers::get_worker));

    let service_routes = Router::new()
        .route("/", post(listings::create))
        .route("/nearby", get(listings::nearby))
        .route("/worker/:worker_id", get(listings::for_worker))
        .route("/:id", put(listings::update).delete(listings::delete));

    let location_routes = Router::new()
        .route("/upsert", post(locations::upsert))
        .route("/nearby", get(locations::nearby));

    let order_routes = Router::new().route("/", post(orders::create));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/auth", auth_routes)
        .nest("/worker", worker_routes)
        .nest("/service", service_routes)
        .nest("/location", location_routes)
        .nest("/order", order_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/api-docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
