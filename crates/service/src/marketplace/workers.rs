use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{LocatedWorker, Worker, WorkerProfile, WorkerProfileInput};
use super::repository::WorkerRepository;
use crate::auth::domain::{AuthContext, Role};
use crate::auth::errors::AuthError;
use crate::errors::{FieldErrors, ServiceError};
use crate::proximity::{Nearby, NearbyQuery, ProximityEngine};

pub struct WorkerService<R: WorkerRepository + ?Sized> {
    repo: Arc<R>,
    engine: ProximityEngine,
}

impl<R: WorkerRepository + ?Sized> WorkerService<R> {
    pub fn new(repo: Arc<R>, engine: ProximityEngine) -> Self { Self { repo, engine } }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn my_profile(&self, ctx: &AuthContext) -> Result<WorkerProfile, ServiceError> {
        ctx.require_role(&[Role::Worker])?;
        let worker = self.own_worker(ctx).await?;
        self.get(worker.id).await
    }

    #[instrument(skip(self, ctx, input), fields(user_id = %ctx.user_id))]
    pub async fn update_profile(&self, ctx: &AuthContext, input: WorkerProfileInput) -> Result<Worker, ServiceError> {
        ctx.require_role(&[Role::Worker])?;
        let input = normalize_profile(input)?;
        let worker = self.own_worker(ctx).await?;
        let updated = self.repo.update_worker_profile(&worker, &input).await?;
        info!(worker_id = %updated.id, skills = ?input.skills.as_ref().map(Vec::len), "worker_profile_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<WorkerProfile, ServiceError> {
        self.repo.worker_profile(id).await?.ok_or_else(|| ServiceError::not_found("Worker"))
    }

    /// Turn the calling CLIENT into a WORKER.
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn upgrade(&self, ctx: &AuthContext) -> Result<Worker, ServiceError> {
        ctx.require_role(&[Role::Client])?;
        let worker = self.repo.promote_to_worker(ctx.user_id).await?.ok_or(AuthError::InvalidUpgrade)?;
        info!(worker_id = %worker.id, "user_upgraded_to_worker");
        Ok(worker)
    }

    /// Workers whose owner's location lies within the query radius, closest first.
    #[instrument(skip(self), fields(max_km = query.max_distance_km()))]
    pub async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Nearby<LocatedWorker>>, ServiceError> {
        let candidates = self.repo.located_workers().await?;
        let total = candidates.len();
        let hits = self.engine.find_nearby(query, candidates, LocatedWorker::point);
        common::metrics::observe_nearby("workers", total, hits.len());
        Ok(hits)
    }

    async fn own_worker(&self, ctx: &AuthContext) -> Result<Worker, ServiceError> {
        self.repo
            .find_worker_by_user(ctx.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Worker"))
    }
}

fn normalize_profile(input: WorkerProfileInput) -> Result<WorkerProfileInput, ServiceError> {
    let mut errors = FieldErrors::new();
    if let Some(price) = input.price {
        if models::worker::validate_price(price).is_err() {
            errors.add("price", "price must be a non-negative number");
        }
    }
    errors.into_result().map_err(ServiceError::invalid_body)?;
    Ok(WorkerProfileInput {
        skills: input.skills.as_deref().map(normalize_skills),
        ..input
    })
}

/// Trim names, drop blanks and collapse duplicates, keeping first-seen order.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for s in skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !out.iter().any(|seen| seen == s) {
            out.push(s.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::InMemoryStore;
    use crate::proximity::GeoPoint;

    fn svc(store: &Arc<InMemoryStore>) -> WorkerService<InMemoryStore> {
        WorkerService::new(store.clone(), ProximityEngine::default())
    }

    #[test]
    fn skills_are_trimmed_and_deduplicated() {
        let raw = vec![" plumbing ".to_string(), "".into(), "wiring".into(), "plumbing".into(), "  ".into()];
        assert_eq!(normalize_skills(&raw), vec!["plumbing", "wiring"]);
    }

    #[tokio::test]
    async fn upgrade_promotes_client_once() {
        let store = Arc::new(InMemoryStore::default());
        let user = store.put_user("Rina", "rina@example.com", Role::Client);
        let svc = svc(&store);
        let ctx = AuthContext::new(user, Role::Client);

        let worker = svc.upgrade(&ctx).await.unwrap();
        assert_eq!(worker.user_id, user);
        assert_eq!(store.role_of(user), Some(Role::Worker));

        // The token still says CLIENT but the stored role has moved on.
        let err = svc.upgrade(&ctx).await.unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::InvalidUpgrade)));
    }

    #[tokio::test]
    async fn worker_only_operations_reject_clients() {
        let store = Arc::new(InMemoryStore::default());
        let ctx = AuthContext::new(Uuid::new_v4(), Role::Client);
        let err = svc(&store).my_profile(&ctx).await.unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::Forbidden)));
    }

    #[tokio::test]
    async fn update_profile_replaces_skills_and_keeps_missing_fields() {
        let store = Arc::new(InMemoryStore::default());
        let (user, worker_id) = store.put_worker("Joko", "joko@example.com");
        let svc = svc(&store);
        let ctx = AuthContext::new(user, Role::Worker);

        svc.update_profile(&ctx, WorkerProfileInput {
            bio: Some("Electrician".into()),
            price: Some(150_000.0),
            phone: Some("628123".into()),
            skills: Some(vec!["wiring".into(), "lighting".into()]),
        })
        .await
        .unwrap();
        let updated = svc.update_profile(&ctx, WorkerProfileInput {
            skills: Some(vec!["solar".into(), " solar ".into()]),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("Electrician"));
        assert_eq!(updated.price, Some(150_000.0));

        let profile = svc.get(worker_id).await.unwrap();
        assert_eq!(profile.skills, vec!["solar"]);
        assert_eq!(profile.user.phone.as_deref(), Some("628123"));
    }

    #[tokio::test]
    async fn update_profile_rejects_negative_price() {
        let store = Arc::new(InMemoryStore::default());
        let (user, _) = store.put_worker("Joko", "joko@example.com");
        let ctx = AuthContext::new(user, Role::Worker);
        let err = svc(&store)
            .update_profile(&ctx, WorkerProfileInput { price: Some(-1.0), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid { .. }));
    }

    #[tokio::test]
    async fn unknown_worker_is_not_found() {
        let store = Arc::new(InMemoryStore::default());
        let err = svc(&store).get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.to_string(), "Worker not found");
    }

    #[tokio::test]
    async fn nearby_workers_are_sorted_and_skip_unlocated() {
        let store = Arc::new(InMemoryStore::default());
        let (far_user, _) = store.put_worker("Far", "far@example.com");
        let (near_user, _) = store.put_worker("Near", "near@example.com");
        let (_nowhere, _) = store.put_worker("Nowhere", "nowhere@example.com");
        store.put_location(far_user, -6.1302, 106.8650);
        store.put_location(near_user, -6.1661, 106.8650);

        let query = NearbyQuery::new(GeoPoint::new(-6.1751, 106.8650), 10.0).unwrap();
        let hits = svc(&store).nearby(&query).await.unwrap();
        let names: Vec<_> = hits.iter().map(|h| h.item.user.name.as_str()).collect();
        assert_eq!(names, vec!["Near", "Far"]);
        assert!((hits[0].distance - 1.0).abs() <= 0.05);
    }
}
