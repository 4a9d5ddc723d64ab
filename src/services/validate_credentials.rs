//! Validate-credentials use case: email + password to sanitized identity.

use std::sync::Arc;

use super::run_blocking;
use crate::domain::{normalize_email, PasswordHasher, UserIdentity};
use crate::errors::AppResult;
use crate::infra::UserRepository;

/// Looks a user up by email and checks the password against the stored hash.
///
/// Pure read + verify: never issues a token. An unknown email and a wrong
/// password both come back as `Ok(None)`.
pub struct ValidateCredentials {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl ValidateCredentials {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn execute(&self, email: &str, password: &str) -> AppResult<Option<UserIdentity>> {
        let email = normalize_email(email);
        let user = self.users.find_by_email(&email).await?;

        // An unknown email still pays for one verification against the decoy.
        let digest = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.hasher.decoy_digest().to_string(),
        };

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let valid = run_blocking(move || Ok(hasher.verify(&password, &digest))).await?;

        match user {
            Some(user) if valid => {
                tracing::debug!(user_id = %user.id, "Credentials validated");
                Ok(Some(user.sanitize()))
            }
            _ => {
                tracing::debug!("Credential validation failed");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, StoreError};
    use crate::infra::MockUserRepository;
    use crate::services::testing;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_valid_credentials_return_identity() {
        let hasher = testing::hasher();
        let user = testing::stored_user("test@example.com", "password123", hasher.as_ref());
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("test@example.com"))
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let use_case = ValidateCredentials::new(Arc::new(repo), hasher);
        let identity = use_case
            .execute("test@example.com", "password123")
            .await
            .unwrap()
            .expect("identity should be returned");

        assert_eq!(identity.id, user_id);
        assert_eq!(identity.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_email_is_normalized_before_lookup() {
        let hasher = testing::hasher();
        let user = testing::stored_user("test@example.com", "password123", hasher.as_ref());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("test@example.com"))
            .returning(move |_| Ok(Some(user.clone())));

        let use_case = ValidateCredentials::new(Arc::new(repo), hasher);
        let result = use_case
            .execute("  Test@Example.com ", "password123")
            .await
            .unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_unknown_email_returns_none() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let use_case = ValidateCredentials::new(Arc::new(repo), testing::hasher());
        let result = use_case
            .execute("nonexistent@example.com", "password123")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_returns_none() {
        let hasher = testing::hasher();
        let user = testing::stored_user("test@example.com", "password123", hasher.as_ref());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let use_case = ValidateCredentials::new(Arc::new(repo), hasher);
        let result = use_case
            .execute("test@example.com", "wrongpassword")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_returns_none() {
        let mut user = testing::stored_user("test@example.com", "x", testing::hasher().as_ref());
        user.password_hash = "not-a-phc-string".to_string();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let use_case = ValidateCredentials::new(Arc::new(repo), testing::hasher());
        let result = use_case.execute("test@example.com", "x").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(StoreError::Unavailable("connection reset".into())));

        let use_case = ValidateCredentials::new(Arc::new(repo), testing::hasher());
        let result = use_case.execute("test@example.com", "password123").await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }
}
