use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Client,
    Worker,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => models::user::ROLE_CLIENT,
            Role::Worker => models::user::ROLE_WORKER,
            Role::Admin => models::user::ROLE_ADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            models::user::ROLE_CLIENT => Ok(Role::Client),
            models::user::ROLE_WORKER => Ok(Role::Worker),
            models::user::ROLE_ADMIN => Ok(Role::Admin),
            other => Err(AuthError::Repository(format!("unknown role {other}"))),
        }
    }
}

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Domain user (business view, never carries the password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Whether the user has stored a location yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    Set,
    NotSet,
}

impl From<bool> for LocationStatus {
    fn from(has_location: bool) -> Self {
        if has_location { LocationStatus::Set } else { LocationStatus::NotSet }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(flatten)]
    pub user: AuthUser,
    pub location_status: LocationStatus,
}

/// Register/login result (session)
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: SessionUser,
    pub token: String,
}

/// Identity of the caller, decoded from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    /// `Forbidden` unless the caller holds one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> Result<(), AuthError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Client, Role::Worker, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("client".parse::<Role>().is_err());
        assert_eq!(serde_json::to_value(Role::Worker).unwrap(), "WORKER");
    }

    #[test]
    fn session_user_flattens_with_location_status() {
        let user = AuthUser { id: Uuid::nil(), name: "Ana".into(), email: "a@b.co".into(), role: Role::Client, phone: None };
        let v = serde_json::to_value(SessionUser { user, location_status: LocationStatus::NotSet }).unwrap();
        assert_eq!(v["locationStatus"], "not_set");
        assert_eq!(v["role"], "CLIENT");
        assert!(v.get("password").is_none());
    }

    #[test]
    fn require_role_checks_membership() {
        let ctx = AuthContext::new(Uuid::new_v4(), Role::Client);
        assert!(ctx.require_role(&[Role::Client, Role::Worker]).is_ok());
        assert!(matches!(ctx.require_role(&[Role::Worker]), Err(AuthError::Forbidden)));
    }
}
