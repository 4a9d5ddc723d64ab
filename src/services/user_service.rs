//! User service - Read access to accounts for authenticated callers.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::UserIdentity;
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Sanitized profile of the user with the given id
    async fn profile(&self, id: Uuid) -> AppResult<UserIdentity>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn profile(&self, id: Uuid) -> AppResult<UserIdentity> {
        self.users
            .find_by_id(id)
            .await?
            .map(UserIdentity::from)
            .ok_or(AppError::NotFound)
    }
}
