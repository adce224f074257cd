//! Address lookup for location upserts.

pub mod nominatim;

use async_trait::async_trait;
use thiserror::Error;

use crate::proximity::GeoPoint;

pub use nominatim::NominatimGeocoder;

/// A resolved place: coordinates plus the provider's formatted address.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub point: GeoPoint,
    pub display_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Http(String),
    #[error("geocoder returned status {0}")]
    Status(u16),
    #[error("unreadable geocoder response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for a free-form address, `None` when nothing matched.
    async fn geocode(&self, address: &str) -> Result<Option<Place>, GeocodeError>;
    /// Address at a coordinate, `None` when the provider knows none.
    async fn reverse(&self, point: GeoPoint) -> Result<Option<Place>, GeocodeError>;
}

/// Geocoder used when lookups are switched off; never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

#[async_trait]
impl Geocoder for DisabledGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Place>, GeocodeError> {
        Ok(None)
    }

    async fn reverse(&self, _point: GeoPoint) -> Result<Option<Place>, GeocodeError> {
        Ok(None)
    }
}

/// Pick the configured geocoder.
pub fn from_config(cfg: &configs::GeocoderConfig) -> Result<std::sync::Arc<dyn Geocoder>, GeocodeError> {
    if cfg.enabled {
        Ok(std::sync::Arc::new(NominatimGeocoder::from_config(cfg)?))
    } else {
        tracing::info!("geocoder disabled");
        Ok(std::sync::Arc::new(DisabledGeocoder))
    }
}
