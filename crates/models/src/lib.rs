//! SeaORM entities for the marketplace schema plus small create/update
//! helpers that validate their inputs before touching the database.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod location;
pub mod worker;
pub mod skill;
pub mod worker_skill;
pub mod service_listing;
pub mod service_order;

pub use errors::ModelError;
