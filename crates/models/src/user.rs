use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const ROLE_CLIENT: &str = "CLIENT";
pub const ROLE_WORKER: &str = "WORKER";
pub const ROLE_ADMIN: &str = "ADMIN";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ModelError::Validation("invalid email".into()));
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') || email.contains(char::is_whitespace) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let len = name.trim().chars().count();
    if !(2..=100).contains(&len) {
        return Err(ModelError::Validation("name must be 2-100 characters".into()));
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<(), ModelError> {
    if ![ROLE_CLIENT, ROLE_WORKER, ROLE_ADMIN].contains(&role) {
        return Err(ModelError::Validation(format!("unknown role {role}")));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, email: &str, role: &str) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_role(role)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        email: Set(email.trim().to_string()),
        role: Set(role.to_string()),
        phone: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email.trim())).one(db).await?)
}

pub async fn find_many<C: ConnectionTrait>(db: &C, ids: Vec<Uuid>) -> Result<Vec<Model>, ModelError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find().filter(Column::Id.is_in(ids)).all(db).await?)
}

pub async fn set_role<C: ConnectionTrait>(db: &C, id: Uuid, role: &str) -> Result<Model, ModelError> {
    validate_role(role)?;
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound("user".into()))?
        .into();
    found.role = Set(role.to_string());
    found.updated_at = Set(Utc::now().into());
    Ok(found.update(db).await?)
}

pub async fn set_phone<C: ConnectionTrait>(db: &C, id: Uuid, phone: Option<String>) -> Result<Model, ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound("user".into()))?
        .into();
    found.phone = Set(phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()));
    found.updated_at = Set(Utc::now().into());
    Ok(found.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("john@example.com").is_ok());
        assert!(validate_email("john@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("john example@x.com").is_err());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn name_length_bounds() {
        assert!(validate_name("Al").is_ok());
        assert!(validate_name("A").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn roles_are_closed_set() {
        assert!(validate_role("WORKER").is_ok());
        assert!(validate_role("worker").is_err());
    }
}
