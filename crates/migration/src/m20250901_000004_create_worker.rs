//! Create `worker` table: the worker-side profile of a user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Worker::Table)
                    .if_not_exists()
                    .col(uuid(Worker::Id).primary_key())
                    .col(uuid(Worker::UserId).unique_key().not_null())
                    .col(ColumnDef::new(Worker::Bio).text().null())
                    .col(ColumnDef::new(Worker::Price).double().null())
                    .col(timestamp_with_time_zone(Worker::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Worker::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_worker_user")
                            .from(Worker::Table, Worker::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Worker::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Worker { Table, Id, UserId, Bio, Price, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
