use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{LocatedWorker, NearbyListing, ServiceInput, ServiceListing, Worker};
use super::repository::ListingRepository;
use crate::auth::domain::{AuthContext, Role};
use crate::errors::{FieldErrors, ServiceError};
use crate::proximity::{Nearby, NearbyQuery, ProximityEngine};

/// CRUD and discovery for the services workers publish.
pub struct ListingService<R: ListingRepository + ?Sized> {
    repo: Arc<R>,
    engine: ProximityEngine,
}

impl<R: ListingRepository + ?Sized> ListingService<R> {
    pub fn new(repo: Arc<R>, engine: ProximityEngine) -> Self { Self { repo, engine } }

    #[instrument(skip(self, ctx, input), fields(user_id = %ctx.user_id))]
    pub async fn create(&self, ctx: &AuthContext, input: ServiceInput) -> Result<ServiceListing, ServiceError> {
        ctx.require_role(&[Role::Worker])?;
        let input = validate(input)?;
        let worker = self.own_worker(ctx).await?;
        let listing = self.repo.create_listing(worker.id, &input).await?;
        info!(listing_id = %listing.id, worker_id = %worker.id, "listing_created");
        Ok(listing)
    }

    #[instrument(skip(self, ctx, input), fields(user_id = %ctx.user_id))]
    pub async fn update(&self, ctx: &AuthContext, id: Uuid, input: ServiceInput) -> Result<ServiceListing, ServiceError> {
        ctx.require_role(&[Role::Worker])?;
        let input = validate(input)?;
        self.owned_listing(ctx, id, "update").await?;
        self.repo.update_listing(id, &input).await
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> Result<(), ServiceError> {
        ctx.require_role(&[Role::Worker])?;
        self.owned_listing(ctx, id, "delete").await?;
        if !self.repo.delete_listing(id).await? {
            return Err(ServiceError::not_found("Service"));
        }
        info!(listing_id = %id, "listing_deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn for_worker(&self, worker_id: Uuid) -> Result<Vec<ServiceListing>, ServiceError> {
        if self.repo.find_worker(worker_id).await?.is_none() {
            return Err(ServiceError::not_found("Worker"));
        }
        self.repo.listings_for_workers(&[worker_id]).await
    }

    /// Rank workers by distance, then emit each matching worker's listings
    /// with that worker's distance. Order stays ascending by distance.
    #[instrument(skip(self), fields(max_km = query.max_distance_km()))]
    pub async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Nearby<NearbyListing>>, ServiceError> {
        let candidates = self.repo.located_workers().await?;
        let total = candidates.len();
        let workers = self.engine.find_nearby(query, candidates, LocatedWorker::point);
        let ids: Vec<Uuid> = workers.iter().map(|w| w.item.worker.id).collect();
        let listings = self.repo.listings_for_workers(&ids).await?;

        let mut by_worker: HashMap<Uuid, Vec<ServiceListing>> = HashMap::with_capacity(ids.len());
        let total_listings = listings.len();
        for listing in listings {
            by_worker.entry(listing.worker_id).or_default().push(listing);
        }

        let mut out = Vec::with_capacity(total_listings);
        for hit in &workers {
            let Some(own) = by_worker.remove(&hit.item.worker.id) else { continue };
            let card = hit.item.card();
            out.extend(own.into_iter().map(|listing| Nearby {
                item: NearbyListing { listing, worker: card.clone() },
                distance: hit.distance,
                point: hit.point,
            }));
        }
        common::metrics::observe_nearby("services", total, out.len());
        Ok(out)
    }

    async fn own_worker(&self, ctx: &AuthContext) -> Result<Worker, ServiceError> {
        self.repo
            .find_worker_by_user(ctx.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Worker"))
    }

    async fn owned_listing(&self, ctx: &AuthContext, id: Uuid, action: &str) -> Result<ServiceListing, ServiceError> {
        let worker = self.own_worker(ctx).await?;
        let listing = self.repo.find_listing(id).await?.ok_or_else(|| ServiceError::not_found("Service"))?;
        if listing.worker_id != worker.id {
            warn!(listing_id = %id, owner = %listing.worker_id, caller = %worker.id, "listing_owner_mismatch");
            return Err(ServiceError::Forbidden(format!("Unauthorized to {action} this service")));
        }
        Ok(listing)
    }
}

fn validate(input: ServiceInput) -> Result<ServiceInput, ServiceError> {
    let mut errors = FieldErrors::new();
    if input.title.trim().is_empty() {
        errors.add("title", "title required");
    } else if input.title.trim().chars().count() > 200 {
        errors.add("title", "title must be at most 200 characters");
    }
    if models::worker::validate_price(input.price).is_err() {
        errors.add("price", "price must be a non-negative number");
    }
    errors.into_result().map_err(ServiceError::invalid_body)?;
    Ok(ServiceInput {
        title: input.title.trim().to_string(),
        description: input.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        price: input.price,
    })
}
