use serde::Serialize;

use super::geo::{distance, GeoPoint, EARTH_RADIUS_KM};
use super::query::NearbyQuery;

/// A candidate that fell inside the search radius, with its distance from
/// the query origin in kilometers.
///
/// Serializes as the payload's own fields plus `distance`; the matched point
/// is kept for callers but not serialized since payloads carry their own
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nearby<T> {
    #[serde(flatten)]
    pub item: T,
    pub distance: f64,
    #[serde(skip)]
    pub point: GeoPoint,
}

/// Ranks located candidates by great-circle distance.
///
/// Stateless apart from the sphere radius; a full scan over the candidate
/// snapshot it is handed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityEngine {
    radius_km: f64,
}

impl Default for ProximityEngine {
    fn default() -> Self {
        Self { radius_km: EARTH_RADIUS_KM }
    }
}

impl ProximityEngine {
    pub fn new(radius_km: f64) -> Self {
        Self { radius_km }
    }

    pub fn distance(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        distance(from, to, self.radius_km)
    }

    /// Keep candidates within `query.max_distance_km()` of the origin, closest
    /// first.
    ///
    /// `locate` extracts a candidate's coordinate; candidates without one are
    /// skipped. The boundary is inclusive and equal distances keep their input
    /// order.
    ///
    /// # Examples
    /// ```
    /// use service::proximity::{GeoPoint, NearbyQuery, ProximityEngine};
    /// let engine = ProximityEngine::default();
    /// let query = NearbyQuery::new(GeoPoint::new(0.0, 0.0), 10.0).unwrap();
    /// let shops = vec![("far", Some(GeoPoint::new(0.0, 90.0))), ("here", Some(GeoPoint::new(0.0, 0.0))), ("ghost", None)];
    /// let hits = engine.find_nearby(&query, shops, |s| s.1);
    /// assert_eq!(hits.len(), 1);
    /// assert_eq!(hits[0].item.0, "here");
    /// ```
    pub fn find_nearby<T, I, F>(&self, query: &NearbyQuery, candidates: I, locate: F) -> Vec<Nearby<T>>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<GeoPoint>,
    {
        rank(self.radius_km, query.origin(), query.max_distance_km(), candidates, locate)
    }
}

/// [`ProximityEngine::find_nearby`] on the Earth with a raw origin and radius.
///
/// The caller is responsible for rejecting a non-positive `max_distance_km`.
pub fn find_nearby<T, I, F>(origin: GeoPoint, max_distance_km: f64, candidates: I, locate: F) -> Vec<Nearby<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Option<GeoPoint>,
{
    rank(EARTH_RADIUS_KM, origin, max_distance_km, candidates, locate)
}

fn rank<T, I, F>(radius: f64, origin: GeoPoint, max_distance: f64, candidates: I, locate: F) -> Vec<Nearby<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Option<GeoPoint>,
{
    let mut hits: Vec<Nearby<T>> = candidates
        .into_iter()
        .filter_map(|item| {
            let point = locate(&item)?;
            let d = distance(origin, point, radius);
            // NaN never compares <=, so malformed points drop out here.
            (d <= max_distance).then_some(Nearby { item, distance: d, point })
        })
        .collect();
    // `sort_by` is stable: ties keep candidate order.
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
