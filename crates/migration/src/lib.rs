//! Migrator registering marketplace tables in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_user;
mod m20250901_000002_create_user_credentials;
mod m20250901_000003_create_location;
mod m20250901_000004_create_worker;
mod m20250901_000005_create_skill;
mod m20250901_000006_create_service;
mod m20250901_000007_create_service_order;
mod m20250901_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_user::Migration),
            Box::new(m20250901_000002_create_user_credentials::Migration),
            Box::new(m20250901_000003_create_location::Migration),
            Box::new(m20250901_000004_create_worker::Migration),
            Box::new(m20250901_000005_create_skill::Migration),
            Box::new(m20250901_000006_create_service::Migration),
            Box::new(m20250901_000007_create_service_order::Migration),
            // Indexes should always be applied last
            Box::new(m20250901_000008_add_indexes::Migration),
        ]
    }
}
