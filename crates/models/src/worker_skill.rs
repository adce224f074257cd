use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{skill, worker};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "worker_skill")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub worker_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub skill_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Worker, Skill }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Worker => Entity::belongs_to(worker::Entity)
                .from(Column::WorkerId)
                .to(worker::Column::Id)
                .into(),
            Relation::Skill => Entity::belongs_to(skill::Entity)
                .from(Column::SkillId)
                .to(skill::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn skill_ids_for_worker<C: ConnectionTrait>(db: &C, worker_id: Uuid) -> Result<Vec<Uuid>, ModelError> {
    let rows = Entity::find().filter(Column::WorkerId.eq(worker_id)).all(db).await?;
    Ok(rows.into_iter().map(|r| r.skill_id).collect())
}

/// Replace the full skill set of a worker.
pub async fn replace_for_worker<C: ConnectionTrait>(db: &C, worker_id: Uuid, skill_ids: &[Uuid]) -> Result<(), ModelError> {
    Entity::delete_many().filter(Column::WorkerId.eq(worker_id)).exec(db).await?;
    if skill_ids.is_empty() {
        return Ok(());
    }
    let rows = skill_ids
        .iter()
        .map(|sid| ActiveModel { worker_id: Set(worker_id), skill_id: Set(*sid) });
    Entity::insert_many(rows).exec(db).await?;
    Ok(())
}
