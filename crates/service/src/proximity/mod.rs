//! Great-circle distance and radius search over located records.

pub mod engine;
pub mod geo;
pub mod query;

pub use engine::{find_nearby, Nearby, ProximityEngine};
pub use geo::{haversine_km, GeoPoint, EARTH_RADIUS_KM};
pub use query::{NearbyParams, NearbyQuery, DEFAULT_MAX_DISTANCE_KM};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProximityError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),
    #[error("maxDistance must be a positive number of kilometers, got {0}")]
    InvalidMaxDistance(f64),
}
