//! Register-user use case: create an account and open a session for it.

use std::sync::Arc;

use super::{run_blocking, AuthSession, SessionClaims, TokenIssuer};
use crate::domain::{normalize_email, PasswordHasher};
use crate::errors::{AppError, AppResult, StoreError, EMAIL_TAKEN};
use crate::infra::UserRepository;

pub struct RegisterUser {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl RegisterUser {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Create the account and issue its first session token.
    ///
    /// The pre-check gives the common case a cheap answer; the store's unique
    /// index is what actually settles two concurrent registrations.
    pub async fn execute(&self, email: &str, password: &str, name: &str) -> AppResult<AuthSession> {
        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let password_hash = run_blocking(move || hasher.hash(&password)).await?;

        let user = match self.users.create(email, password_hash, name.to_string()).await {
            Ok(user) => user,
            Err(StoreError::DuplicateKey) => {
                tracing::debug!("Registration lost race on unique email");
                return Err(AppError::conflict(EMAIL_TAKEN));
            }
            Err(e) => return Err(e.into()),
        };

        let token = self.tokens.issue(
            user.id,
            SessionClaims {
                email: user.email.clone(),
            },
        )?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(AuthSession::new(token, user.sanitize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::infra::MockUserRepository;
    use crate::services::testing;
    use mockall::predicate::eq;

    fn use_case(repo: MockUserRepository) -> RegisterUser {
        RegisterUser::new(Arc::new(repo), testing::hasher(), testing::tokens())
    }

    #[tokio::test]
    async fn test_register_returns_session_for_new_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("a@x.com"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|email, hash, name| {
                email == "a@x.com" && hash.starts_with("$argon2id$") && name == "Ann"
            })
            .times(1)
            .returning(|email, hash, name| Ok(User::new(email, hash, name)));

        let session = use_case(repo)
            .execute("A@X.com", "Secret1!", "Ann")
            .await
            .unwrap();

        assert_eq!(session.user.email, "a@x.com");
        assert_eq!(session.user.name, "Ann");
        assert_eq!(session.token.token_type, "Bearer");

        let claims = testing::issuer().verify(&session.token.access_token).unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.session.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_register_existing_email_skips_hashing_and_insert() {
        let existing = User::new("a@x.com".into(), "hash".into(), "Ann".into());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create().never();

        let result = use_case(repo).execute("a@x.com", "Secret1!", "Ann").await;

        match result {
            Err(AppError::Conflict(message)) => assert_eq!(message, EMAIL_TAKEN),
            other => panic!("expected conflict, got {:?}", other.map(|s| s.user)),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_key_race_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|_, _, _| Err(StoreError::DuplicateKey));

        let result = use_case(repo).execute("a@x.com", "Secret1!", "Ann").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_store_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|_, _, _| Err(StoreError::Unavailable("timeout".into())));

        let result = use_case(repo).execute("a@x.com", "Secret1!", "Ann").await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_register_never_stores_plaintext() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|_, hash, _| !hash.contains("Secret1!"))
            .returning(|email, hash, name| Ok(User::new(email, hash, name)));

        assert!(use_case(repo)
            .execute("a@x.com", "Secret1!", "Ann")
            .await
            .is_ok());
    }
}
