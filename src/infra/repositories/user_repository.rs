//! User repository trait and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    sqlx, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    RuntimeErr, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{StoreError, StoreResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Emails are matched exactly; callers pass them already normalised.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user, generating its id and timestamps.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if the email is already taken.
    async fn create(&self, email: String, password_hash: String, name: String) -> StoreResult<User>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Postgres-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, email: String, password_hash: String, name: String) -> StoreResult<User> {
        let user = User::new(email, password_hash, name);
        let active_model = ActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };

        let model = active_model.insert(&self.db).await.map_err(translate)?;
        Ok(User::from(model))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(translate)?;

        Ok(result.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(translate)?;

        Ok(result.map(User::from))
    }
}

/// Map a SeaORM error onto the repository taxonomy.
fn translate(err: DbErr) -> StoreError {
    if is_unique_violation(&err) {
        return StoreError::DuplicateKey;
    }
    tracing::warn!("User store operation failed: {}", err);
    StoreError::Unavailable(err.to_string())
}

fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => {
            e.is_unique_violation()
        }
        _ => false,
    }
}
