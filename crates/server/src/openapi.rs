use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{IntoParams, Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    /// Field name to messages, present on validation failures.
    pub errors: Option<std::collections::HashMap<String, Vec<String>>>,
}

#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SessionUserDoc {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// `CLIENT`, `WORKER` or `ADMIN`.
    pub role: String,
    pub phone: Option<String>,
    /// `set` or `not_set`.
    pub location_status: String,
}

#[derive(ToSchema)]
pub struct SessionResponse { pub message: String, pub token: String, pub user: SessionUserDoc }

#[derive(ToSchema)]
pub struct UpgradeResponse {
    pub message: String,
    pub token: String,
    #[schema(value_type = Object)]
    pub worker: serde_json::Value,
}

#[derive(ToSchema)]
pub struct WorkerProfileRequest {
    pub bio: Option<String>,
    pub price: Option<f64>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct ServiceRequest { pub title: String, pub description: Option<String>, pub price: f64 }

#[derive(ToSchema)]
pub struct LocationRequest { pub latitude: Option<f64>, pub longitude: Option<f64>, pub address: Option<String> }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct OrderRequest {
    pub worker_id: Uuid,
    /// RFC 3339 timestamp.
    pub service_date: String,
    pub note: Option<String>,
}

/// Query string shared by the nearby endpoints.
#[derive(IntoParams)]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct NearbyQueryDoc {
    /// Origin latitude in decimal degrees.
    pub lat: f64,
    /// Origin longitude in decimal degrees.
    pub lon: f64,
    /// Search radius in kilometers; defaults to the configured radius.
    pub max_distance: Option<f64>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::upgrade_worker,
        crate::routes::workers::my_profile,
        crate::routes::workers::update_profile,
        crate::routes::workers::get_worker,
        crate::routes::workers::nearby,
        crate::routes::listings::create,
        crate::routes::listings::update,
        crate::routes::listings::delete,
        crate::routes::listings::for_worker,
        crate::routes::listings::nearby,
        crate::routes::locations::upsert,
        crate::routes::locations::nearby,
        crate::routes::orders::create,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            RegisterRequest,
            LoginRequest,
            SessionUserDoc,
            SessionResponse,
            UpgradeResponse,
            WorkerProfileRequest,
            ServiceRequest,
            LocationRequest,
            OrderRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "worker"),
        (name = "service"),
        (name = "location"),
        (name = "order")
    )
)]
pub struct ApiDoc;
