//! Service layer for the marketplace: business rules on top of `models`.
//! - Proximity search shared by every "nearby" operation.
//! - Auth and marketplace services behind async repository traits, with a
//!   SeaORM implementation and an in-memory one for tests.

pub mod errors;
pub mod proximity;
pub mod auth;
pub mod marketplace;
pub mod geocoding;
pub mod mock;

pub use errors::{FieldErrors, ServiceError};
