use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use models::errors::ModelError;
use service::auth::AuthError;
use service::proximity::ProximityError;
use service::{FieldErrors, ServiceError};

/// JSON error body `{ "message": .., "errors"?: { field: [..] } }` with its status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<FieldErrors>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: None }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { message: &self.message, errors: self.errors.as_ref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let code = e.code();
        match e {
            AuthError::Validation(errors) => ApiError::bad_request("Invalid input").with_errors(errors),
            AuthError::Conflict | AuthError::InvalidUpgrade => ApiError::bad_request(e.to_string()),
            AuthError::NotFound => ApiError::new(StatusCode::NOT_FOUND, "User not found"),
            AuthError::Unauthorized | AuthError::MissingToken | AuthError::InvalidToken => {
                ApiError::new(StatusCode::UNAUTHORIZED, e.to_string())
            }
            AuthError::Forbidden => ApiError::new(StatusCode::FORBIDDEN, e.to_string()),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                error!(code, error = %e, "auth failure");
                ApiError::internal()
            }
        }
    }
}

impl From<ProximityError> for ApiError {
    fn from(e: ProximityError) -> Self {
        let field = match &e {
            ProximityError::Missing(f) | ProximityError::NotANumber { field: f, .. } => *f,
            ProximityError::LatitudeOutOfRange(_) => "lat",
            ProximityError::LongitudeOutOfRange(_) => "lon",
            ProximityError::InvalidMaxDistance(_) => "maxDistance",
        };
        let mut errors = FieldErrors::new();
        errors.add(field, e.to_string());
        ApiError::bad_request("Invalid query parameters").with_errors(errors)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Invalid { message, errors } => ApiError::bad_request(message).with_errors(errors),
            ServiceError::BadRequest(m) => ApiError::bad_request(m),
            ServiceError::NotFound(m) => ApiError::new(StatusCode::NOT_FOUND, m),
            ServiceError::Forbidden(m) => ApiError::new(StatusCode::FORBIDDEN, m),
            ServiceError::Auth(e) => e.into(),
            ServiceError::Proximity(e) => e.into(),
            ServiceError::Geocoding(e) => {
                warn!(error = %e, "geocoder unavailable");
                ApiError::new(StatusCode::BAD_GATEWAY, "Geocoding service unavailable")
            }
            ServiceError::Model(ModelError::Validation(m)) => ApiError::bad_request(m),
            ServiceError::Model(ModelError::NotFound(what)) => {
                ApiError::new(StatusCode::NOT_FOUND, format!("{} not found", what))
            }
            ServiceError::Db(m) | ServiceError::Model(ModelError::Db(m)) => {
                error!(error = %m, "database failure");
                ApiError::internal()
            }
        }
    }
}

fn rejected(kind: &str, detail: String) -> ApiError {
    let mut errors = FieldErrors::new();
    errors.add(kind, detail);
    ApiError::bad_request(format!("Invalid request {}", kind)).with_errors(errors)
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        rejected("body", r.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        rejected("path", r.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        rejected("query", r.body_text())
    }
}
