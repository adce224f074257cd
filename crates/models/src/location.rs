use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "location")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ModelError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ModelError::Validation("latitude must be within [-90, 90]".into()));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ModelError::Validation("longitude must be within [-180, 180]".into()));
    }
    Ok(())
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

pub async fn find_by_users<C: ConnectionTrait>(db: &C, user_ids: Vec<Uuid>) -> Result<Vec<Model>, ModelError> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find().filter(Column::UserId.is_in(user_ids)).all(db).await?)
}

/// Insert or replace the single location of a user.
pub async fn upsert<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    latitude: f64,
    longitude: f64,
    address: Option<String>,
) -> Result<Model, ModelError> {
    validate_coordinates(latitude, longitude)?;
    let now = Utc::now().into();
    match find_by_user(db, user_id).await? {
        Some(existing) => {
            let mut am: ActiveModel = existing.into();
            am.latitude = Set(latitude);
            am.longitude = Set(longitude);
            am.address = Set(address);
            am.updated_at = Set(now);
            Ok(am.update(db).await?)
        }
        None => {
            let am = ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                latitude: Set(latitude),
                longitude: Set(longitude),
                address: Set(address),
                created_at: Set(now),
                updated_at: Set(now),
            };
            Ok(am.insert(db).await?)
        }
    }
}
