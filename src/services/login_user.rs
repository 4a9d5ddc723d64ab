//! Login use case.

use std::sync::Arc;

use super::{AuthSession, SessionClaims, TokenIssuer, ValidateCredentials};
use crate::errors::{AppError, AppResult};

/// Validates credentials and, on success, opens a session.
pub struct LoginUser {
    validate: Arc<ValidateCredentials>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginUser {
    pub fn new(validate: Arc<ValidateCredentials>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { validate, tokens }
    }

    pub async fn execute(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        // Unknown email and wrong password are reported identically.
        let identity = self
            .validate
            .execute(email, password)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let token = self.tokens.issue(
            identity.id,
            SessionClaims {
                email: identity.email.clone(),
            },
        )?;

        tracing::info!(user_id = %identity.id, "User logged in");
        Ok(AuthSession::new(token, identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::infra::MockUserRepository;
    use crate::services::testing;

    fn use_case(repo: MockUserRepository) -> LoginUser {
        let validate = ValidateCredentials::new(Arc::new(repo), testing::hasher());
        LoginUser::new(Arc::new(validate), testing::tokens())
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let user = testing::stored_user("a@x.com", "Secret1!", testing::hasher().as_ref());
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let session = use_case(repo).execute("a@x.com", "Secret1!").await.unwrap();

        assert_eq!(session.user.id, user_id);
        let claims = testing::issuer().verify(&session.token.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let user = testing::stored_user("a@x.com", "Secret1!", testing::hasher().as_ref());

        let mut known = MockUserRepository::new();
        known
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        let mut unknown = MockUserRepository::new();
        unknown.expect_find_by_email().returning(|_| Ok(None));

        let wrong_password = use_case(known).execute("a@x.com", "wrong").await;
        let unknown_email = use_case(unknown).execute("b@x.com", "Secret1!").await;

        let (Err(first), Err(second)) = (wrong_password, unknown_email) else {
            panic!("both logins should fail");
        };
        assert!(matches!(first, AppError::Unauthorized));
        assert!(matches!(second, AppError::Unauthorized));
        assert_eq!(first.user_message(), second.user_message());
    }

    #[tokio::test]
    async fn test_login_store_failure_is_not_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(StoreError::Unavailable("down".into())));

        let result = use_case(repo).execute("a@x.com", "Secret1!").await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }
}
