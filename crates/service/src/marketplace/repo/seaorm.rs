use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait};
use uuid::Uuid;

use crate::auth::domain::Role;
use crate::errors::ServiceError;
use crate::marketplace::domain::{
    LocatedWorker, Location, LocationWithUser, Order, OrderInput, ServiceInput, ServiceListing, UserSummary, Worker,
    WorkerProfile, WorkerProfileInput,
};
use crate::marketplace::repository::{ListingRepository, LocationRepository, OrderRepository, WorkerRepository};

/// Postgres-backed marketplace persistence over the `models` entities.
#[derive(Clone)]
pub struct SeaOrmMarketplaceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmMarketplaceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn users_by_id(&self, ids: Vec<Uuid>) -> Result<HashMap<Uuid, UserSummary>, ServiceError> {
        let users = models::user::find_many(&self.db, ids).await?;
        users
            .into_iter()
            .map(|u| to_summary(u).map(|s| (s.id, s)))
            .collect()
    }
}

fn to_summary(u: models::user::Model) -> Result<UserSummary, ServiceError> {
    let role = u.role.parse::<Role>().map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(UserSummary { id: u.id, name: u.name, email: u.email, role, phone: u.phone })
}

#[async_trait]
impl WorkerRepository for SeaOrmMarketplaceRepository {
    async fn find_worker(&self, id: Uuid) -> Result<Option<Worker>, ServiceError> {
        Ok(models::worker::Entity::find_by_id(id).one(&self.db).await?.map(Worker::from))
    }

    async fn find_worker_by_user(&self, user_id: Uuid) -> Result<Option<Worker>, ServiceError> {
        Ok(models::worker::find_by_user(&self.db, user_id).await?.map(Worker::from))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, ServiceError> {
        models::user::Entity::find_by_id(id).one(&self.db).await?.map(to_summary).transpose()
    }

    async fn worker_profile(&self, worker_id: Uuid) -> Result<Option<WorkerProfile>, ServiceError> {
        let Some(worker) = models::worker::Entity::find_by_id(worker_id).one(&self.db).await? else {
            return Ok(None);
        };
        let Some(user) = self.find_user(worker.user_id).await? else {
            return Ok(None);
        };
        let skill_ids = models::worker_skill::skill_ids_for_worker(&self.db, worker.id).await?;
        let mut skills: Vec<String> = models::skill::find_many(&self.db, skill_ids)
            .await?
            .into_iter()
            .map(|s| s.name)
            .collect();
        skills.sort();
        let services = models::service_listing::list_for_workers(&self.db, vec![worker.id])
            .await?
            .into_iter()
            .map(ServiceListing::from)
            .collect();
        let location = models::location::find_by_user(&self.db, worker.user_id).await?.map(Location::from);
        Ok(Some(WorkerProfile { worker: worker.into(), user, skills, services, location }))
    }

    async fn located_workers(&self) -> Result<Vec<LocatedWorker>, ServiceError> {
        let workers = models::worker::list_all(&self.db).await?;
        let user_ids: Vec<Uuid> = workers.iter().map(|w| w.user_id).collect();
        let mut users = self.users_by_id(user_ids.clone()).await?;
        let mut locations: HashMap<Uuid, Location> = models::location::find_by_users(&self.db, user_ids)
            .await?
            .into_iter()
            .map(|l| (l.user_id, Location::from(l)))
            .collect();
        Ok(workers
            .into_iter()
            .filter_map(|w| {
                let user = users.remove(&w.user_id)?;
                let location = locations.remove(&w.user_id);
                Some(LocatedWorker { worker: w.into(), user, location })
            })
            .collect())
    }

    async fn update_worker_profile(&self, worker: &Worker, input: &WorkerProfileInput) -> Result<Worker, ServiceError> {
        let txn = self.db.begin().await?;
        if let Some(phone) = &input.phone {
            models::user::set_phone(&txn, worker.user_id, Some(phone.clone())).await?;
        }
        let updated = models::worker::update_profile(&txn, worker.id, input.bio.clone(), input.price).await?;
        if let Some(names) = &input.skills {
            let mut ids = Vec::with_capacity(names.len());
            for name in names {
                ids.push(models::skill::find_or_create(&txn, name).await?.id);
            }
            models::worker_skill::replace_for_worker(&txn, worker.id, &ids).await?;
        }
        txn.commit().await?;
        Ok(updated.into())
    }

    async fn promote_to_worker(&self, user_id: Uuid) -> Result<Option<Worker>, ServiceError> {
        let txn = self.db.begin().await?;
        let user = models::user::Entity::find_by_id(user_id).one(&txn).await?;
        if !matches!(user, Some(ref u) if u.role == models::user::ROLE_CLIENT) {
            return Ok(None);
        }
        let worker = models::worker::create(&txn, user_id).await?;
        models::user::set_role(&txn, user_id, models::user::ROLE_WORKER).await?;
        txn.commit().await?;
        Ok(Some(worker.into()))
    }
}

#[async_trait]
impl ListingRepository for SeaOrmMarketplaceRepository {
    async fn find_listing(&self, id: Uuid) -> Result<Option<ServiceListing>, ServiceError> {
        Ok(models::service_listing::Entity::find_by_id(id).one(&self.db).await?.map(ServiceListing::from))
    }

    async fn create_listing(&self, worker_id: Uuid, input: &ServiceInput) -> Result<ServiceListing, ServiceError> {
        let m = models::service_listing::create(&self.db, worker_id, &input.title, input.description.clone(), input.price).await?;
        Ok(m.into())
    }

    async fn update_listing(&self, id: Uuid, input: &ServiceInput) -> Result<ServiceListing, ServiceError> {
        let m = models::service_listing::update(&self.db, id, &input.title, input.description.clone(), input.price).await?;
        Ok(m.into())
    }

    async fn delete_listing(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(models::service_listing::delete(&self.db, id).await?)
    }

    async fn listings_for_workers(&self, worker_ids: &[Uuid]) -> Result<Vec<ServiceListing>, ServiceError> {
        Ok(models::service_listing::list_for_workers(&self.db, worker_ids.to_vec())
            .await?
            .into_iter()
            .map(ServiceListing::from)
            .collect())
    }
}

#[async_trait]
impl LocationRepository for SeaOrmMarketplaceRepository {
    async fn upsert_location(&self, user_id: Uuid, latitude: f64, longitude: f64, address: Option<String>) -> Result<Location, ServiceError> {
        Ok(models::location::upsert(&self.db, user_id, latitude, longitude, address).await?.into())
    }

    async fn locations_with_users(&self) -> Result<Vec<LocationWithUser>, ServiceError> {
        let locations = models::location::Entity::find()
            .order_by_asc(models::location::Column::CreatedAt)
            .order_by_asc(models::location::Column::Id)
            .all(&self.db)
            .await?;
        let users = self.users_by_id(locations.iter().map(|l| l.user_id).collect()).await?;
        Ok(locations
            .into_iter()
            .filter_map(|l| {
                let user = users.get(&l.user_id)?.clone();
                Some(LocationWithUser { location: l.into(), user })
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for SeaOrmMarketplaceRepository {
    async fn create_order(&self, client_id: Uuid, input: &OrderInput) -> Result<Order, ServiceError> {
        let m = models::service_order::create(&self.db, client_id, input.worker_id, input.service_date, input.note.clone()).await?;
        Ok(m.into())
    }
}
