//! Create `skill` dictionary and the `worker_skill` join table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Skill::Table)
                    .if_not_exists()
                    .col(uuid(Skill::Id).primary_key())
                    .col(string_len(Skill::Name, 100).unique_key().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkerSkill::Table)
                    .if_not_exists()
                    .col(uuid(WorkerSkill::WorkerId).not_null())
                    .col(uuid(WorkerSkill::SkillId).not_null())
                    .primary_key(
                        Index::create()
                            .col(WorkerSkill::WorkerId)
                            .col(WorkerSkill::SkillId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_worker_skill_worker")
                            .from(WorkerSkill::Table, WorkerSkill::WorkerId)
                            .to(Worker::Table, Worker::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_worker_skill_skill")
                            .from(WorkerSkill::Table, WorkerSkill::SkillId)
                            .to(Skill::Table, Skill::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WorkerSkill::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Skill::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Skill { Table, Id, Name }

#[derive(DeriveIden)]
enum WorkerSkill { Table, WorkerId, SkillId }

#[derive(DeriveIden)]
enum Worker { Table, Id }
