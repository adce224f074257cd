use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: listings are fetched per worker
        manager
            .create_index(
                Index::create()
                    .name("idx_service_worker")
                    .table(Service::Table)
                    .col(Service::WorkerId)
                    .to_owned(),
            )
            .await?;

        // ServiceOrder: lookups by either party
        manager
            .create_index(
                Index::create()
                    .name("idx_service_order_client")
                    .table(ServiceOrder::Table)
                    .col(ServiceOrder::ClientId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_order_worker")
                    .table(ServiceOrder::Table)
                    .col(ServiceOrder::WorkerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_service_order_worker").table(ServiceOrder::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_service_order_client").table(ServiceOrder::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_service_worker").table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service { Table, WorkerId }

#[derive(DeriveIden)]
enum ServiceOrder { Table, ClientId, WorkerId }
