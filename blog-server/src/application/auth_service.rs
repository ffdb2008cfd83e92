use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

pub const PASSWORD_MIN_LENGTH: usize = 6;

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))
    }

    /// Creates the account and returns it with a fresh access token.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<(User, String), DomainError> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(DomainError::Validation(format!(
                "Password must be at least {PASSWORD_MIN_LENGTH} characters"
            )));
        }

        let hash =
            hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = User::new(email, name.unwrap_or_default().trim().to_string(), hash);
        let user = self.repo.create(user).await?;
        let token = self.issue_token(user.id)?;
        Ok((user, token))
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let user = self
            .repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        self.issue_token(user.id)
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.keys
            .generate_token(user_id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use chrono::Duration;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryStore::new()),
            JwtKeys::new("test-secret".into(), Duration::hours(1)),
        )
    }

    #[tokio::test]
    async fn register_then_login() {
        let auth = service();
        let (user, token) = auth
            .register("Ada@Example.com", "secret1", Some("Ada".into()))
            .await
            .unwrap();

        assert_eq!(user.email, "ada@example.com");
        let claims = auth.keys().verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());

        let token = auth.login("ada@example.com", "secret1").await.unwrap();
        assert!(auth.keys().verify_token(&token).is_ok());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = service();
        auth.register("bob@example.com", "secret1", None).await.unwrap();

        assert!(matches!(
            auth.login("bob@example.com", "nope-nope").await,
            Err(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@example.com", "secret1").await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let auth = service();
        auth.register("eve@example.com", "secret1", None).await.unwrap();
        assert!(matches!(
            auth.register("EVE@example.com", "secret2", None).await,
            Err(DomainError::UserAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let auth = service();
        assert!(matches!(
            auth.register("not-an-email", "secret1", None).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            auth.register("a@b.c", "short", None).await,
            Err(DomainError::Validation(_))
        ));
    }
}
