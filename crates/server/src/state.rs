use std::sync::Arc;

use service::auth::repository::AuthRepository;
use service::auth::{AuthService, TokenIssuer};
use service::geocoding::Geocoder;
use service::marketplace::repository::{
    ListingRepository, LocationRepository, OrderRepository, WorkerRepository,
};
use service::marketplace::{ListingService, LocationService, OrderService, WorkerService};
use service::proximity::ProximityEngine;

/// Shared handler state: one service per resource, all behind trait objects
/// so the router runs the same against SeaORM or the in-memory store.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub workers: Arc<WorkerService<dyn WorkerRepository>>,
    pub listings: Arc<ListingService<dyn ListingRepository>>,
    pub locations: Arc<LocationService<dyn LocationRepository>>,
    pub orders: Arc<OrderService<dyn OrderRepository>>,
    pub default_max_distance_km: f64,
}

impl ServerState {
    /// Wire the services over an auth repository and a marketplace repository.
    pub fn new<M>(
        auth_repo: Arc<dyn AuthRepository>,
        market: Arc<M>,
        geocoder: Arc<dyn Geocoder>,
        tokens: TokenIssuer,
        proximity: &configs::ProximityConfig,
    ) -> Self
    where
        M: ListingRepository + LocationRepository + OrderRepository + 'static,
    {
        let engine = ProximityEngine::new(proximity.earth_radius_km);
        let workers: Arc<dyn WorkerRepository> = market.clone();
        let listings: Arc<dyn ListingRepository> = market.clone();
        let locations: Arc<dyn LocationRepository> = market.clone();
        let orders: Arc<dyn OrderRepository> = market;
        Self {
            auth: Arc::new(AuthService::new(auth_repo, tokens)),
            workers: Arc::new(WorkerService::new(workers, engine)),
            listings: Arc::new(ListingService::new(listings, engine)),
            locations: Arc::new(LocationService::new(locations, geocoder, engine)),
            orders: Arc::new(OrderService::new(orders)),
            default_max_distance_km: proximity.default_max_distance_km,
        }
    }
}
