//! Workers, their listings, user locations and orders.
//!
//! Same layering as [`crate::auth`]: plain domain types, async repository
//! traits, and services that take the caller's [`crate::auth::AuthContext`].

pub mod domain;
pub mod repository;
pub mod repo;
pub mod workers;
pub mod listings;
pub mod locations;
pub mod orders;

pub use listings::ListingService;
pub use locations::LocationService;
pub use orders::OrderService;
pub use workers::WorkerService;
