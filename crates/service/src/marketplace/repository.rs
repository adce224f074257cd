use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{
    LocatedWorker, Location, LocationWithUser, Order, OrderInput, ServiceInput, ServiceListing, UserSummary, Worker,
    WorkerProfile, WorkerProfileInput,
};
use crate::errors::ServiceError;

#[async_trait]
pub trait WorkerRepository: Send + Sync {
    async fn find_worker(&self, id: Uuid) -> Result<Option<Worker>, ServiceError>;
    async fn find_worker_by_user(&self, user_id: Uuid) -> Result<Option<Worker>, ServiceError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, ServiceError>;
    async fn worker_profile(&self, worker_id: Uuid) -> Result<Option<WorkerProfile>, ServiceError>;

    /// Every worker with its user and location, oldest first. Workers whose
    /// user has no location are included with `location: None`.
    async fn located_workers(&self) -> Result<Vec<LocatedWorker>, ServiceError>;

    /// Apply a normalized profile update: `None` fields are left unchanged and
    /// `skills`, when present, replaces the whole skill set.
    async fn update_worker_profile(&self, worker: &Worker, input: &WorkerProfileInput) -> Result<Worker, ServiceError>;

    /// Create the worker row and flip the user's role in one step. `None`
    /// when the user is missing or is not a CLIENT.
    async fn promote_to_worker(&self, user_id: Uuid) -> Result<Option<Worker>, ServiceError>;
}

#[async_trait]
pub trait ListingRepository: WorkerRepository {
    async fn find_listing(&self, id: Uuid) -> Result<Option<ServiceListing>, ServiceError>;
    async fn create_listing(&self, worker_id: Uuid, input: &ServiceInput) -> Result<ServiceListing, ServiceError>;
    async fn update_listing(&self, id: Uuid, input: &ServiceInput) -> Result<ServiceListing, ServiceError>;
    async fn delete_listing(&self, id: Uuid) -> Result<bool, ServiceError>;
    /// Listings of the given workers, oldest first.
    async fn listings_for_workers(&self, worker_ids: &[Uuid]) -> Result<Vec<ServiceListing>, ServiceError>;
}

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn upsert_location(&self, user_id: Uuid, latitude: f64, longitude: f64, address: Option<String>) -> Result<Location, ServiceError>;
    async fn locations_with_users(&self) -> Result<Vec<LocationWithUser>, ServiceError>;
}

#[async_trait]
pub trait OrderRepository: WorkerRepository {
    async fn create_order(&self, client_id: Uuid, input: &OrderInput) -> Result<Order, ServiceError>;
}
