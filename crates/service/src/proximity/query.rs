use serde::Deserialize;

use super::geo::GeoPoint;
use super::ProximityError;

/// Radius used when a nearby request omits `maxDistance`.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 10.0;

/// A validated nearby search: an in-range origin and a positive radius in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    origin: GeoPoint,
    max_distance_km: f64,
}

impl NearbyQuery {
    pub fn new(origin: GeoPoint, max_distance_km: f64) -> Result<Self, ProximityError> {
        let origin = GeoPoint::try_new(origin.latitude, origin.longitude)?;
        if !max_distance_km.is_finite() || max_distance_km <= 0.0 {
            return Err(ProximityError::InvalidMaxDistance(max_distance_km));
        }
        Ok(Self { origin, max_distance_km })
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }
}

/// Raw `?lat=&lon=&maxDistance=` query string values.
///
/// Kept as strings so a malformed number surfaces as a [`ProximityError`]
/// naming the field instead of a generic deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyParams {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default, rename = "maxDistance")]
    pub max_distance: Option<String>,
}

impl NearbyParams {
    pub fn into_query(self, default_max_distance_km: f64) -> Result<NearbyQuery, ProximityError> {
        let lat = parse_number("lat", self.lat.as_deref())?.ok_or(ProximityError::Missing("lat"))?;
        let lon = parse_number("lon", self.lon.as_deref())?.ok_or(ProximityError::Missing("lon"))?;
        let max = parse_number("maxDistance", self.max_distance.as_deref())?.unwrap_or(default_max_distance_km);
        NearbyQuery::new(GeoPoint::new(lat, lon), max)
    }
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<f64>, ProximityError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| ProximityError::NotANumber { field, value: raw.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: Option<&str>, lon: Option<&str>, max: Option<&str>) -> NearbyParams {
        NearbyParams {
            lat: lat.map(String::from),
            lon: lon.map(String::from),
            max_distance: max.map(String::from),
        }
    }

    #[test]
    fn default_radius_applies_when_omitted() {
        let q = params(Some("-6.1751"), Some("106.865"), None).into_query(DEFAULT_MAX_DISTANCE_KM).unwrap();
        assert_eq!(q.max_distance_km(), 10.0);
        assert_eq!(q.origin(), GeoPoint::new(-6.1751, 106.865));
    }

    #[test]
    fn blank_radius_counts_as_omitted() {
        let q = params(Some("0"), Some("0"), Some("  ")).into_query(7.5).unwrap();
        assert_eq!(q.max_distance_km(), 7.5);
    }

    #[test]
    fn zero_coordinates_are_valid() {
        let q = params(Some("0"), Some("0"), Some("5")).into_query(10.0).unwrap();
        assert_eq!(q.origin(), GeoPoint::new(0.0, 0.0));
    }

    #[test]
    fn missing_coordinates_are_rejected() {
        assert_eq!(params(None, Some("1"), None).into_query(10.0), Err(ProximityError::Missing("lat")));
        assert_eq!(params(Some("1"), None, None).into_query(10.0), Err(ProximityError::Missing("lon")));
    }

    #[test]
    fn non_numeric_values_name_the_field() {
        let err = params(Some("abc"), Some("1"), None).into_query(10.0).unwrap_err();
        assert_eq!(err, ProximityError::NotANumber { field: "lat", value: "abc".into() });
        let err = params(Some("1"), Some("1"), Some("far")).into_query(10.0).unwrap_err();
        assert!(matches!(err, ProximityError::NotANumber { field: "maxDistance", .. }));
    }

    #[test]
    fn out_of_range_origin_is_rejected() {
        assert_eq!(
            params(Some("95"), Some("0"), None).into_query(10.0),
            Err(ProximityError::LatitudeOutOfRange(95.0))
        );
        assert!(params(Some("NaN"), Some("0"), None).into_query(10.0).is_err());
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        assert_eq!(
            params(Some("0"), Some("0"), Some("0")).into_query(10.0),
            Err(ProximityError::InvalidMaxDistance(0.0))
        );
        assert!(params(Some("0"), Some("0"), Some("-3")).into_query(10.0).is_err());
        assert!(NearbyQuery::new(GeoPoint::new(0.0, 0.0), f64::INFINITY).is_err());
    }
}
