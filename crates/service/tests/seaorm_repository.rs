//! Exercises the SeaORM repositories against a real Postgres.
//! Skipped unless `DATABASE_URL` is set.

use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::{AuthContext, AuthService, Role, TokenIssuer};
use service::auth::domain::RegisterInput;
use service::marketplace::domain::{ServiceInput, WorkerProfileInput};
use service::marketplace::repo::seaorm::SeaOrmMarketplaceRepository;
use service::marketplace::{ListingService, WorkerService};
use service::proximity::{GeoPoint, NearbyQuery, ProximityEngine};
use service::marketplace::repository::LocationRepository;

async fn db() -> anyhow::Result<Option<DatabaseConnection>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(None);
    }
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

#[tokio::test]
async fn register_upgrade_publish_and_find_nearby() -> anyhow::Result<()> {
    let Some(db) = db().await? else { return Ok(()) };
    let auth = AuthService::new(Arc::new(SeaOrmAuthRepository::new(db.clone())), TokenIssuer::new("test-secret", 1));
    let repo = Arc::new(SeaOrmMarketplaceRepository::new(db.clone()));
    let workers = WorkerService::new(repo.clone(), ProximityEngine::default());
    let listings = ListingService::new(repo.clone(), ProximityEngine::default());

    let email = format!("worker_{}@example.com", Uuid::new_v4());
    let session = auth
        .register(RegisterInput { name: "Seno".into(), email, password: "Passw0rd!".into() })
        .await?;
    let user_id = session.user.user.id;

    let worker = workers.upgrade(&AuthContext::new(user_id, Role::Client)).await?;
    let ctx = AuthContext::new(user_id, Role::Worker);
    workers
        .update_profile(&ctx, WorkerProfileInput {
            bio: Some("Tukang".into()),
            price: Some(75_000.0),
            phone: Some("62811".into()),
            skills: Some(vec!["roofing".into(), "painting".into()]),
        })
        .await?;
    let listing = listings
        .create(&ctx, ServiceInput { title: "Roof repair".into(), description: None, price: 90_000.0 })
        .await?;

    // A unique spot in the Southern Ocean so other test rows stay out of range.
    let lat = -60.0 + (user_id.as_u128() % 1000) as f64 * 0.001;
    repo.upsert_location(user_id, lat, 100.0, None).await?;

    let profile = workers.get(worker.id).await?;
    assert_eq!(profile.skills, vec!["painting", "roofing"]);
    assert_eq!(profile.user.phone.as_deref(), Some("62811"));

    let query = NearbyQuery::new(GeoPoint::new(lat, 100.0), 0.5)?;
    let hits = listings.nearby(&query).await?;
    assert!(hits.iter().any(|h| h.item.listing.id == listing.id && h.distance == 0.0));
    Ok(())
}
