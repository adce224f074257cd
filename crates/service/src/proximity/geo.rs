use serde::{Deserialize, Serialize};

use super::ProximityError;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point without range checks. Use [`GeoPoint::try_new`] for
    /// untrusted input.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, ProximityError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ProximityError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ProximityError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Great-circle distance between two points on a sphere of `radius`.
///
/// The result is in the unit of `radius`. NaN coordinates yield NaN.
///
/// # Examples
/// ```
/// use service::proximity::geo::{distance, GeoPoint};
/// let d = distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0), 1.0);
/// assert!((d - std::f64::consts::PI).abs() < 1e-9);
/// ```
pub fn distance(from: GeoPoint, to: GeoPoint, radius: f64) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    // Rounding can push `a` a hair past 1 for antipodal points.
    let a = ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    radius * c
}

/// [`distance`] on the Earth, in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    distance(from, to, EARTH_RADIUS_KM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-9;

    fn samples() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(-6.1751, 106.8650),
            GeoPoint::new(51.5074, -0.1278),
            GeoPoint::new(40.7128, -74.0060),
            GeoPoint::new(-33.8688, 151.2093),
            GeoPoint::new(90.0, 0.0),
            GeoPoint::new(-90.0, 45.0),
            GeoPoint::new(12.5, 179.9),
            GeoPoint::new(12.5, -179.9),
        ]
    }

    #[test]
    fn identical_points_are_zero_apart() {
        for p in samples() {
            assert_eq!(haversine_km(p, p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pts = samples();
        for a in &pts {
            for b in &pts {
                let ab = haversine_km(*a, *b);
                let ba = haversine_km(*b, *a);
                assert!((ab - ba).abs() < TOL, "{a:?} {b:?}: {ab} vs {ba}");
            }
        }
    }

    #[test]
    fn triangle_inequality_holds() {
        let pts = samples();
        for a in &pts {
            for b in &pts {
                for c in &pts {
                    let direct = haversine_km(*a, *c);
                    let via = haversine_km(*a, *b) + haversine_km(*b, *c);
                    assert!(direct <= via + 1e-3, "{a:?} -> {b:?} -> {c:?}");
                }
            }
        }
    }

    #[test]
    fn antipodal_points_are_half_a_circumference_apart() {
        let d = distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0), 1.0);
        assert!((d - PI).abs() < TOL);
        let d = haversine_km(GeoPoint::new(45.0, 30.0), GeoPoint::new(-45.0, -150.0));
        assert!((d - PI * EARTH_RADIUS_KM).abs() < 1e-3);
    }

    #[test]
    fn quarter_circle_on_the_equator() {
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 90.0));
        assert!((d - 10007.54).abs() < 0.01, "got {d}");
    }

    #[test]
    fn one_kilometer_north_of_jakarta() {
        let jakarta = GeoPoint::new(-6.1751, 106.8650);
        let north = GeoPoint::new(-6.1661, 106.8650);
        let d = haversine_km(jakarta, north);
        assert!((d - 1.0).abs() <= 0.05, "got {d}");
    }

    #[test]
    fn dateline_crossing_is_short() {
        let d = haversine_km(GeoPoint::new(12.5, 179.9), GeoPoint::new(12.5, -179.9));
        assert!(d < 25.0, "got {d}");
    }

    #[test]
    fn nan_propagates() {
        let d = haversine_km(GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(0.0, 0.0));
        assert!(d.is_nan());
    }

    #[test]
    fn try_new_checks_ranges() {
        assert!(GeoPoint::try_new(-90.0, 180.0).is_ok());
        assert_eq!(GeoPoint::try_new(91.0, 0.0), Err(ProximityError::LatitudeOutOfRange(91.0)));
        assert_eq!(GeoPoint::try_new(0.0, -181.0), Err(ProximityError::LongitudeOutOfRange(-181.0)));
        assert!(GeoPoint::try_new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn distance_km_method_matches_free_function() {
        let a = GeoPoint::new(51.5074, -0.1278);
        let b = GeoPoint::new(48.8566, 2.3522);
        assert_eq!(a.distance_km(&b), haversine_km(a, b));
        assert!((a.distance_km(&b) - 343.5).abs() < 1.0);
    }
}
