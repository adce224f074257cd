use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::auth::errors::AuthError;
use crate::geocoding::GeocodeError;
use crate::proximity::ProximityError;

/// Per-field validation messages, serialized as `{ "field": ["msg", ..] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Invalid { message: String, errors: FieldErrors },
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Proximity(#[from] ProximityError),
    #[error("geocoding failed: {0}")]
    Geocoding(#[from] GeocodeError),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn invalid_body(errors: FieldErrors) -> Self {
        Self::Invalid { message: "Invalid request body".into(), errors }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_group_by_field() {
        let mut errs = FieldErrors::new();
        errs.add("price", "must be >= 0");
        errs.add("title", "required");
        errs.add("price", "must be finite");
        assert_eq!(errs.get("price").map(<[String]>::len), Some(2));
        let v = serde_json::to_value(&errs).unwrap();
        assert_eq!(v["title"], serde_json::json!(["required"]));
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn not_found_message() {
        assert_eq!(ServiceError::not_found("Worker").to_string(), "Worker not found");
    }
}
