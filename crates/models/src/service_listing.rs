//! Entity for the `service` table: an offering published by a worker.

use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::worker;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub worker_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Worker }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Worker => Entity::belongs_to(worker::Entity)
                .from(Column::WorkerId)
                .to(worker::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate(title: &str, price: f64) -> Result<(), ModelError> {
    if title.trim().is_empty() {
        return Err(ModelError::Validation("title required".into()));
    }
    if title.trim().chars().count() > 200 {
        return Err(ModelError::Validation("title must be at most 200 characters".into()));
    }
    worker::validate_price(price)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    worker_id: Uuid,
    title: &str,
    description: Option<String>,
    price: f64,
) -> Result<Model, ModelError> {
    validate(title, price)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        worker_id: Set(worker_id),
        title: Set(title.trim().to_string()),
        description: Set(description),
        price: Set(price),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    title: &str,
    description: Option<String>,
    price: f64,
) -> Result<Model, ModelError> {
    validate(title, price)?;
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound("service".into()))?
        .into();
    found.title = Set(title.trim().to_string());
    found.description = Set(description);
    found.price = Set(price);
    found.updated_at = Set(Utc::now().into());
    Ok(found.update(db).await?)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Listings of the given workers, oldest first.
pub async fn list_for_workers<C: ConnectionTrait>(db: &C, worker_ids: Vec<Uuid>) -> Result<Vec<Model>, ModelError> {
    if worker_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::WorkerId.is_in(worker_ids))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::validate;

    #[test]
    fn rejects_blank_title_and_bad_price() {
        assert!(validate("Pipe Repair", 30.0).is_ok());
        assert!(validate("   ", 30.0).is_err());
        assert!(validate("Pipe Repair", -1.0).is_err());
        assert!(validate("Pipe Repair", f64::INFINITY).is_err());
    }
}
