use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::domain::{Location, LocationInput, LocationWithUser};
use super::repository::LocationRepository;
use crate::auth::domain::{AuthContext, Role};
use crate::errors::{FieldErrors, ServiceError};
use crate::geocoding::Geocoder;
use crate::proximity::{GeoPoint, Nearby, NearbyQuery, ProximityEngine};

pub struct LocationService<R: LocationRepository + ?Sized> {
    repo: Arc<R>,
    geocoder: Arc<dyn Geocoder>,
    engine: ProximityEngine,
}

impl<R: LocationRepository + ?Sized> LocationService<R> {
    pub fn new(repo: Arc<R>, geocoder: Arc<dyn Geocoder>, engine: ProximityEngine) -> Self {
        Self { repo, geocoder, engine }
    }

    /// Store the caller's single location, filling coordinates from the
    /// address or the address from the coordinates when one side is missing.
    #[instrument(skip(self, ctx, input), fields(user_id = %ctx.user_id))]
    pub async fn upsert(&self, ctx: &AuthContext, input: LocationInput) -> Result<Location, ServiceError> {
        ctx.require_role(&[Role::Client, Role::Worker])?;
        validate(&input)?;

        let mut latitude = input.latitude;
        let mut longitude = input.longitude;
        let mut address = input.address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

        let needs_lookup = latitude.is_none() || longitude.is_none();
        if let Some(addr) = address.clone().filter(|_| needs_lookup) {
            let place = self
                .geocoder
                .geocode(&addr)
                .await?
                .ok_or_else(|| ServiceError::BadRequest("Invalid address: No geocoding result found".into()))?;
            latitude = Some(place.point.latitude);
            longitude = Some(place.point.longitude);
            if place.display_name.is_some() {
                address = place.display_name;
            }
        }

        let (Some(lat), Some(lon)) = (latitude, longitude) else {
            return Err(ServiceError::BadRequest(
                "Latitude and longitude are required or must be resolvable from address".into(),
            ));
        };

        if address.is_none() {
            // Best effort: a failed reverse lookup still stores the coordinates.
            match self.geocoder.reverse(GeoPoint::new(lat, lon)).await {
                Ok(place) => address = place.and_then(|p| p.display_name),
                Err(e) => warn!(err = %e, "reverse geocoding failed"),
            }
        }

        let location = self.repo.upsert_location(ctx.user_id, lat, lon, address).await?;
        info!(location_id = %location.id, "location_upserted");
        Ok(location)
    }

    #[instrument(skip(self), fields(max_km = query.max_distance_km()))]
    pub async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Nearby<LocationWithUser>>, ServiceError> {
        let candidates = self.repo.locations_with_users().await?;
        let total = candidates.len();
        let hits = self.engine.find_nearby(query, candidates, |l| Some(l.location.point()));
        common::metrics::observe_nearby("locations", total, hits.len());
        Ok(hits)
    }
}

fn validate(input: &LocationInput) -> Result<(), ServiceError> {
    let mut errors = FieldErrors::new();
    if let Some(lat) = input.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            errors.add("latitude", "latitude must be within [-90, 90]");
        }
    }
    if let Some(lon) = input.longitude {
        if !(-180.0..=180.0).contains(&lon) {
            errors.add("longitude", "longitude must be within [-180, 180]");
        }
    }
    errors.into_result().map_err(ServiceError::invalid_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::{DisabledGeocoder, GeocodeError, Place};
    use crate::mock::InMemoryStore;
    use async_trait::async_trait;
    use uuid::Uuid;

    struct FixedGeocoder;

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<Place>, GeocodeError> {
            Ok((address == "Monas").then(|| Place {
                point: GeoPoint::new(-6.1754, 106.8272),
                display_name: Some("Monumen Nasional, Jakarta".into()),
            }))
        }

        async fn reverse(&self, point: GeoPoint) -> Result<Option<Place>, GeocodeError> {
            Ok(Some(Place { point, display_name: Some("Somewhere".into()) }))
        }
    }

    struct BrokenGeocoder;

    #[async_trait]
    impl Geocoder for BrokenGeocoder {
        async fn geocode(&self, _address: &str) -> Result<Option<Place>, GeocodeError> {
            Err(GeocodeError::Status(503))
        }

        async fn reverse(&self, _point: GeoPoint) -> Result<Option<Place>, GeocodeError> {
            Err(GeocodeError::Status(503))
        }
    }

    fn svc(store: &Arc<InMemoryStore>, geocoder: Arc<dyn Geocoder>) -> LocationService<InMemoryStore> {
        LocationService::new(store.clone(), geocoder, ProximityEngine::default())
    }

    fn client(store: &InMemoryStore) -> AuthContext {
        AuthContext::new(store.put_user("Dewi", "dewi@example.com", Role::Client), Role::Client)
    }

    #[tokio::test]
    async fn address_only_is_geocoded() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = client(&store);
        let loc = svc(&store, Arc::new(FixedGeocoder))
            .upsert(&ctx, LocationInput { address: Some("Monas".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(loc.latitude, -6.1754);
        assert_eq!(loc.address.as_deref(), Some("Monumen Nasional, Jakarta"));
    }

    #[tokio::test]
    async fn unknown_address_is_a_bad_request() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = client(&store);
        let err = svc(&store, Arc::new(FixedGeocoder))
            .upsert(&ctx, LocationInput { address: Some("Atlantis".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid address: No geocoding result found");
    }

    #[tokio::test]
    async fn zero_coordinates_are_stored_and_reverse_geocoded() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = client(&store);
        let loc = svc(&store, Arc::new(FixedGeocoder))
            .upsert(&ctx, LocationInput { latitude: Some(0.0), longitude: Some(0.0), address: None })
            .await
            .unwrap();
        assert_eq!((loc.latitude, loc.longitude), (0.0, 0.0));
        assert_eq!(loc.address.as_deref(), Some("Somewhere"));
    }

    #[tokio::test]
    async fn reverse_failure_still_stores_coordinates() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = client(&store);
        let loc = svc(&store, Arc::new(BrokenGeocoder))
            .upsert(&ctx, LocationInput { latitude: Some(1.0), longitude: Some(2.0), address: None })
            .await
            .unwrap();
        assert!(loc.address.is_none());
    }

    #[tokio::test]
    async fn forward_failure_surfaces_as_geocoding_error() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = client(&store);
        let err = svc(&store, Arc::new(BrokenGeocoder))
            .upsert(&ctx, LocationInput { address: Some("Monas".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Geocoding(_)));
    }

    #[tokio::test]
    async fn missing_coordinates_without_address_is_rejected() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = client(&store);
        let err = svc(&store, Arc::new(DisabledGeocoder))
            .upsert(&ctx, LocationInput { latitude: Some(1.0), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_invalid() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = client(&store);
        let err = svc(&store, Arc::new(DisabledGeocoder))
            .upsert(&ctx, LocationInput { latitude: Some(91.0), longitude: Some(0.0), address: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid { .. }));
    }

    #[tokio::test]
    async fn upsert_replaces_previous_location() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = client(&store);
        let svc = svc(&store, Arc::new(DisabledGeocoder));
        let first = svc.upsert(&ctx, LocationInput { latitude: Some(1.0), longitude: Some(1.0), address: None }).await.unwrap();
        let second = svc.upsert(&ctx, LocationInput { latitude: Some(2.0), longitude: Some(2.0), address: Some("Here".into()) }).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.address.as_deref(), Some("Here"));
    }

    #[tokio::test]
    async fn nearby_locations_carry_user_and_distance() {
        let store = Arc::new(InMemoryStore::default());
        let a = store.put_user("A", "a@example.com", Role::Client);
        let b = store.put_user("B", "b@example.com", Role::Worker);
        store.put_location(a, -6.1481, 106.8650);
        store.put_location(b, -6.1661, 106.8650);
        store.put_location(Uuid::new_v4(), 40.0, -74.0);

        let q = NearbyQuery::new(GeoPoint::new(-6.1751, 106.8650), 10.0).unwrap();
        let hits = svc(&store, Arc::new(DisabledGeocoder)).nearby(&q).await.unwrap();
        let names: Vec<_> = hits.iter().map(|h| h.item.user.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
