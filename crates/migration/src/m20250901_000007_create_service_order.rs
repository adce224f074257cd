//! Create `service_order` table linking a client to the worker they booked.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOrder::Table)
                    .if_not_exists()
                    .col(uuid(ServiceOrder::Id).primary_key())
                    .col(uuid(ServiceOrder::ClientId).not_null())
                    .col(uuid(ServiceOrder::WorkerId).not_null())
                    .col(timestamp_with_time_zone(ServiceOrder::ServiceDate).not_null())
                    .col(string_len(ServiceOrder::Status, 16).not_null())
                    .col(ColumnDef::new(ServiceOrder::Note).text().null())
                    .col(timestamp_with_time_zone(ServiceOrder::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceOrder::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_order_client")
                            .from(ServiceOrder::Table, ServiceOrder::ClientId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_order_worker")
                            .from(ServiceOrder::Table, ServiceOrder::WorkerId)
                            .to(Worker::Table, Worker::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceOrder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceOrder { Table, Id, ClientId, WorkerId, ServiceDate, Status, Note, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Worker { Table, Id }
