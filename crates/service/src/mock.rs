//! In-memory implementation of every repository trait.
//!
//! Backs unit tests, doc examples and the router tests in the `server`
//! crate. Records keep insertion order, which stands in for the
//! `created_at` ordering of the SeaORM repositories.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials, Role};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::errors::ServiceError;
use crate::marketplace::domain::{
    LocatedWorker, Location, LocationWithUser, Order, OrderInput, ServiceInput, ServiceListing, UserSummary, Worker,
    WorkerProfile, WorkerProfileInput,
};
use crate::marketplace::repository::{ListingRepository, LocationRepository, OrderRepository, WorkerRepository};

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    users: Vec<AuthUser>,
    creds: HashMap<Uuid, Credentials>,
    locations: Vec<Location>,
    workers: Vec<Worker>,
    skills: HashMap<Uuid, Vec<String>>,
    listings: Vec<ServiceListing>,
    orders: Vec<Order>,
}

impl State {
    fn user(&self, id: Uuid) -> Option<&AuthUser> {
        self.users.iter().find(|u| u.id == id)
    }

    fn summary(&self, id: Uuid) -> Option<UserSummary> {
        self.user(id).map(summary)
    }

    fn location(&self, user_id: Uuid) -> Option<&Location> {
        self.locations.iter().find(|l| l.user_id == user_id)
    }

    fn insert_user(&mut self, name: &str, email: &str, role: Role) -> AuthUser {
        let user = AuthUser { id: Uuid::new_v4(), name: name.to_string(), email: email.to_string(), role, phone: None };
        self.users.push(user.clone());
        user
    }

    fn insert_worker(&mut self, user_id: Uuid) -> Worker {
        let now = Utc::now();
        let worker = Worker { id: Uuid::new_v4(), user_id, bio: None, price: None, created_at: now, updated_at: now };
        self.workers.push(worker.clone());
        worker
    }

    fn upsert_location(&mut self, user_id: Uuid, latitude: f64, longitude: f64, address: Option<String>) -> Location {
        let now = Utc::now();
        if let Some(existing) = self.locations.iter_mut().find(|l| l.user_id == user_id) {
            existing.latitude = latitude;
            existing.longitude = longitude;
            existing.address = address;
            existing.updated_at = now;
            return existing.clone();
        }
        let loc = Location { id: Uuid::new_v4(), user_id, latitude, longitude, address, created_at: now, updated_at: now };
        self.locations.push(loc.clone());
        loc
    }
}

fn summary(u: &AuthUser) -> UserSummary {
    UserSummary { id: u.id, name: u.name.clone(), email: u.email.clone(), role: u.role, phone: u.phone.clone() }
}

impl InMemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a user without credentials.
    pub fn put_user(&self, name: &str, email: &str, role: Role) -> Uuid {
        self.state().insert_user(name, email, role).id
    }

    /// Seed a WORKER user and its worker row; returns `(user_id, worker_id)`.
    pub fn put_worker(&self, name: &str, email: &str) -> (Uuid, Uuid) {
        let mut state = self.state();
        let user = state.insert_user(name, email, Role::Worker);
        let worker = state.insert_worker(user.id);
        (user.id, worker.id)
    }

    pub fn put_location(&self, user_id: Uuid, latitude: f64, longitude: f64) -> Uuid {
        self.state().upsert_location(user_id, latitude, longitude, None).id
    }

    pub fn set_phone(&self, user_id: Uuid, phone: &str) {
        if let Some(u) = self.state().users.iter_mut().find(|u| u.id == user_id) {
            u.phone = Some(phone.to_string());
        }
    }

    pub fn role_of(&self, user_id: Uuid) -> Option<Role> {
        self.state().user(user_id).map(|u| u.role)
    }

    pub fn order_count(&self) -> usize {
        self.state().orders.len()
    }
}

#[async_trait]
impl AuthRepository for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.state().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.state().user(id).cloned())
    }

    async fn create_user(&self, name: &str, email: &str, role: Role) -> Result<AuthUser, AuthError> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == email) {
            return Err(AuthError::Conflict);
        }
        Ok(state.insert_user(name, email, role))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        Ok(self.state().creds.get(&user_id).cloned())
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = Credentials { user_id, password_hash, password_algorithm };
        self.state().creds.insert(user_id, c.clone());
        Ok(c)
    }

    async fn has_location(&self, user_id: Uuid) -> Result<bool, AuthError> {
        Ok(self.state().location(user_id).is_some())
    }
}

#[async_trait]
impl WorkerRepository for InMemoryStore {
    async fn find_worker(&self, id: Uuid) -> Result<Option<Worker>, ServiceError> {
        Ok(self.state().workers.iter().find(|w| w.id == id).cloned())
    }

    async fn find_worker_by_user(&self, user_id: Uuid) -> Result<Option<Worker>, ServiceError> {
        Ok(self.state().workers.iter().find(|w| w.user_id == user_id).cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, ServiceError> {
        Ok(self.state().summary(id))
    }

    async fn worker_profile(&self, worker_id: Uuid) -> Result<Option<WorkerProfile>, ServiceError> {
        let state = self.state();
        let Some(worker) = state.workers.iter().find(|w| w.id == worker_id).cloned() else {
            return Ok(None);
        };
        let Some(user) = state.summary(worker.user_id) else {
            return Ok(None);
        };
        let mut skills = state.skills.get(&worker.id).cloned().unwrap_or_default();
        skills.sort();
        let services = state.listings.iter().filter(|l| l.worker_id == worker.id).cloned().collect();
        let location = state.location(worker.user_id).cloned();
        Ok(Some(WorkerProfile { worker, user, skills, services, location }))
    }

    async fn located_workers(&self) -> Result<Vec<LocatedWorker>, ServiceError> {
        let state = self.state();
        Ok(state
            .workers
            .iter()
            .filter_map(|w| {
                Some(LocatedWorker {
                    worker: w.clone(),
                    user: state.summary(w.user_id)?,
                    location: state.location(w.user_id).cloned(),
                })
            })
            .collect())
    }

    async fn update_worker_profile(&self, worker: &Worker, input: &WorkerProfileInput) -> Result<Worker, ServiceError> {
        let mut state = self.state();
        if let Some(phone) = &input.phone {
            if let Some(u) = state.users.iter_mut().find(|u| u.id == worker.user_id) {
                u.phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
            }
        }
        if let Some(skills) = &input.skills {
            state.skills.insert(worker.id, skills.clone());
        }
        let w = state
            .workers
            .iter_mut()
            .find(|w| w.id == worker.id)
            .ok_or_else(|| ServiceError::not_found("Worker"))?;
        if input.bio.is_some() {
            w.bio = input.bio.clone();
        }
        if input.price.is_some() {
            w.price = input.price;
        }
        w.updated_at = Utc::now();
        Ok(w.clone())
    }

    async fn promote_to_worker(&self, user_id: Uuid) -> Result<Option<Worker>, ServiceError> {
        let mut state = self.state();
        let Some(user) = state.users.iter_mut().find(|u| u.id == user_id && u.role == Role::Client) else {
            return Ok(None);
        };
        user.role = Role::Worker;
        Ok(Some(state.insert_worker(user_id)))
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn find_listing(&self, id: Uuid) -> Result<Option<ServiceListing>, ServiceError> {
        Ok(self.state().listings.iter().find(|l| l.id == id).cloned())
    }

    async fn create_listing(&self, worker_id: Uuid, input: &ServiceInput) -> Result<ServiceListing, ServiceError> {
        let now = Utc::now();
        let listing = ServiceListing {
            id: Uuid::new_v4(),
            worker_id,
            title: input.title.clone(),
            description: input.description.clone(),
            price: input.price,
            created_at: now,
            updated_at: now,
        };
        self.state().listings.push(listing.clone());
        Ok(listing)
    }

    async fn update_listing(&self, id: Uuid, input: &ServiceInput) -> Result<ServiceListing, ServiceError> {
        let mut state = self.state();
        let l = state
            .listings
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| ServiceError::not_found("Service"))?;
        l.title = input.title.clone();
        l.description = input.description.clone();
        l.price = input.price;
        l.updated_at = Utc::now();
        Ok(l.clone())
    }

    async fn delete_listing(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut state = self.state();
        let before = state.listings.len();
        state.listings.retain(|l| l.id != id);
        Ok(state.listings.len() != before)
    }

    async fn listings_for_workers(&self, worker_ids: &[Uuid]) -> Result<Vec<ServiceListing>, ServiceError> {
        Ok(self
            .state()
            .listings
            .iter()
            .filter(|l| worker_ids.contains(&l.worker_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn upsert_location(&self, user_id: Uuid, latitude: f64, longitude: f64, address: Option<String>) -> Result<Location, ServiceError> {
        Ok(self.state().upsert_location(user_id, latitude, longitude, address))
    }

    async fn locations_with_users(&self) -> Result<Vec<LocationWithUser>, ServiceError> {
        let state = self.state();
        Ok(state
            .locations
            .iter()
            .filter_map(|l| Some(LocationWithUser { location: l.clone(), user: state.summary(l.user_id)? }))
            .collect())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create_order(&self, client_id: Uuid, input: &OrderInput) -> Result<Order, ServiceError> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            client_id,
            worker_id: input.worker_id,
            service_date: input.service_date,
            status: models::service_order::STATUS_PENDING.to_string(),
            note: input.note.clone(),
            created_at: now,
            updated_at: now,
        };
        self.state().orders.push(order.clone());
        Ok(order)
    }
}
