//! Create `location` table: at most one geographic point per user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(uuid(Location::Id).primary_key())
                    .col(uuid(Location::UserId).unique_key().not_null())
                    .col(double(Location::Latitude).not_null())
                    .col(double(Location::Longitude).not_null())
                    .col(ColumnDef::new(Location::Address).text().null())
                    .col(timestamp_with_time_zone(Location::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Location::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_user")
                            .from(Location::Table, Location::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Location::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Location { Table, Id, UserId, Latitude, Longitude, Address, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
