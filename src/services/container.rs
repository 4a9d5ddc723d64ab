//! Service Container - Centralized service access.
//!
//! Builds the authentication and user services once around a single
//! repository, password hasher and token issuer.

use std::sync::Arc;

use super::{AuthService, Authenticator, JwtTokenIssuer, UserManager, UserService};
use crate::config::Config;
use crate::domain::Argon2Hasher;
use crate::errors::AppResult;
use crate::infra::UserRepository;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container from already-built services
    pub fn new(auth_service: Arc<dyn AuthService>, user_service: Arc<dyn UserService>) -> Self {
        Self {
            auth_service,
            user_service,
        }
    }

    /// Create the services over `users` with collaborators taken from config
    pub fn from_config(users: Arc<dyn UserRepository>, config: &Config) -> AppResult<Self> {
        let hasher = Arc::new(Argon2Hasher::new(&config.hashing)?);
        let tokens = Arc::new(JwtTokenIssuer::new(config.token.clone()));

        let auth_service = Arc::new(Authenticator::new(Arc::clone(&users), hasher, tokens));
        let user_service = Arc::new(UserManager::new(users));

        Ok(Self::new(auth_service, user_service))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
