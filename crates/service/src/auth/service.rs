use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};
use uuid::Uuid;

use super::domain::{AuthContext, AuthSession, AuthUser, LoginInput, RegisterInput, Role, SessionUser};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token::TokenIssuer;
use crate::errors::FieldErrors;

pub const PASSWORD_ALGORITHM: &str = "argon2";
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 128;

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    tokens: TokenIssuer,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenIssuer) -> Self { Self { repo, tokens } }

    /// Register a new CLIENT with a hashed password and return a session.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenIssuer};
    /// use service::auth::domain::RegisterInput;
    /// use service::mock::InMemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(InMemoryStore::default()), TokenIssuer::new("secret", 24));
    /// let input = RegisterInput { name: "Test".into(), email: "user@example.com".into(), password: "Secret123".into() };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        validate_register(&input).map_err(AuthError::Validation)?;
        let email = input.email.trim();
        if let Some(existing) = self.repo.find_user_by_email(email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(input.name.trim(), email, Role::Client).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        self.repo.upsert_password(user.id, hash, PASSWORD_ALGORITHM.into()).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        let token = self.tokens.issue(user.id, user.role)?;
        Ok(AuthSession { user: SessionUser { user, location_status: false.into() }, token })
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenIssuer};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use service::mock::InMemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(InMemoryStore::default()), TokenIssuer::new("secret", 24));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "Nia".into(), email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        validate_login(&input).map_err(AuthError::Validation)?;
        let user = self.repo
            .find_user_by_email(input.email.trim())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let location_status = self.repo.has_location(user.id).await?.into();
        let token = self.tokens.issue(user.id, user.role)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user: SessionUser { user, location_status }, token })
    }

    /// Fresh token for an identity whose role may have changed.
    pub fn issue_token(&self, user_id: Uuid, role: Role) -> Result<String, AuthError> {
        self.tokens.issue(user_id, role)
    }

    pub fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.tokens.verify(token)
    }

    pub async fn current_user(&self, ctx: &AuthContext) -> Result<AuthUser, AuthError> {
        self.repo.find_user(ctx.user_id).await?.ok_or(AuthError::NotFound)
    }
}

fn validate_register(input: &RegisterInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Err(e) = models::user::validate_name(&input.name) {
        errors.add("name", e.to_string());
    }
    if models::user::validate_email(&input.email).is_err() {
        errors.add("email", "Invalid email");
    }
    let len = input.password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        errors.add("password", format!("password must be {PASSWORD_MIN}-{PASSWORD_MAX} characters"));
    }
    errors.into_result()
}

fn validate_login(input: &LoginInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if models::user::validate_email(&input.email).is_err() {
        errors.add("email", "Invalid email");
    }
    if input.password.chars().count() < PASSWORD_MIN {
        errors.add("password", format!("password must be at least {PASSWORD_MIN} characters"));
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::LocationStatus;
    use crate::mock::InMemoryStore;

    fn svc() -> (Arc<InMemoryStore>, AuthService<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        (store.clone(), AuthService::new(store, TokenIssuer::new("test-secret", 24)))
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput { name: "Budi".into(), email: email.into(), password: "Passw0rd!".into() }
    }

    #[tokio::test]
    async fn register_creates_client_with_token() {
        let (_, svc) = svc();
        let session = svc.register(register_input("budi@example.com")).await.unwrap();
        assert_eq!(session.user.user.role, Role::Client);
        assert_eq!(session.user.location_status, LocationStatus::NotSet);
        let ctx = svc.authenticate(&session.token).unwrap();
        assert_eq!(ctx.user_id, session.user.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (_, svc) = svc();
        svc.register(register_input("dup@example.com")).await.unwrap();
        let err = svc.register(register_input("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn register_reports_every_invalid_field() {
        let (_, svc) = svc();
        let err = svc
            .register(RegisterInput { name: "B".into(), email: "nope".into(), password: "short".into() })
            .await
            .unwrap_err();
        let AuthError::Validation(errors) = err else { panic!("expected validation error") };
        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() {
        let (_, svc) = svc();
        svc.register(register_input("wp@example.com")).await.unwrap();
        let err = svc
            .login(LoginInput { email: "wp@example.com".into(), password: "WrongPass1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn login_unknown_email_is_unauthorized() {
        let (_, svc) = svc();
        let err = svc
            .login(LoginInput { email: "ghost@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn login_reports_location_status() {
        let (store, svc) = svc();
        let user = svc.register(register_input("loc@example.com")).await.unwrap().user.user;
        store.put_location(user.id, -6.2, 106.8);
        let session = svc
            .login(LoginInput { email: "loc@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();
        assert_eq!(session.user.location_status, LocationStatus::Set);
    }
}
