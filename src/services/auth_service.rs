//! Authentication service - Handles registration, login and session tokens.
//!
//! The trait is the seam the HTTP layer depends on; [`Authenticator`]
//! composes the individual use cases behind it.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::{
    Claims, IssuedToken, LoginUser, RegisterUser, TokenIssuer, ValidateCredentials,
};
use crate::domain::{PasswordHasher, UserIdentity};
use crate::errors::AppResult;
use crate::infra::UserRepository;

/// Session returned after successful registration or login
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthSession {
    #[serde(flatten)]
    pub token: IssuedToken,
    /// The authenticated user
    pub user: UserIdentity,
}

impl AuthSession {
    pub fn new(token: IssuedToken, user: UserIdentity) -> Self {
        Self { token, user }
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and open a session
    async fn register(&self, email: String, password: String, name: String) -> AppResult<AuthSession>;

    /// Login and return a session
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Check credentials without issuing anything
    async fn validate_credentials(
        &self,
        email: String,
        password: String,
    ) -> AppResult<Option<UserIdentity>>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    register: RegisterUser,
    login: LoginUser,
    validate: Arc<ValidateCredentials>,
    tokens: Arc<dyn TokenIssuer>,
}

impl Authenticator {
    /// Wire the use cases around shared collaborators
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        let validate = Arc::new(ValidateCredentials::new(
            Arc::clone(&users),
            Arc::clone(&hasher),
        ));

        Self {
            register: RegisterUser::new(users, hasher, Arc::clone(&tokens)),
            login: LoginUser::new(Arc::clone(&validate), Arc::clone(&tokens)),
            validate,
            tokens,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, email: String, password: String, name: String) -> AppResult<AuthSession> {
        self.register.execute(&email, &password, &name).await
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        self.login.execute(&email, &password).await
    }

    async fn validate_credentials(
        &self,
        email: String,
        password: String,
    ) -> AppResult<Option<UserIdentity>> {
        self.validate.execute(&email, &password).await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }
}
