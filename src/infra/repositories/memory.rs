//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserRepository;
use crate::domain::User;
use crate::errors::{StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Index for email -> user ID lookup
    email_index: HashMap<String, Uuid>,
}

/// Process-local implementation of UserRepository.
///
/// Enforces email uniqueness under a single write lock, so concurrent
/// inserts of one email behave like a unique index: one wins, the rest get
/// [`StoreError::DuplicateKey`].
#[derive(Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<Tables>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.tables.read().await.users.len()
    }

    /// Whether no user has been stored yet
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, email: String, password_hash: String, name: String) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.email_index.contains_key(&email) {
            return Err(StoreError::DuplicateKey);
        }

        let user = User::new(email, password_hash, name);
        tables.email_index.insert(user.email.clone(), user.id);
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .email_index
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo
            .create("a@x.com".into(), "hash".into(), "Ann".into())
            .await
            .unwrap();

        let by_email = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(by_email.id, created.id);
        assert_eq!(by_id.email, "a@x.com");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let repo = InMemoryUserRepository::new();
        repo.create("a@x.com".into(), "hash".into(), "Ann".into())
            .await
            .unwrap();

        assert!(repo.find_by_email("A@x.com").await.unwrap().is_none());
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create("a@x.com".into(), "hash".into(), "Ann".into())
            .await
            .unwrap();

        let second = repo
            .create("a@x.com".into(), "other".into(), "Ann2".into())
            .await;

        assert_eq!(second.unwrap_err(), StoreError::DuplicateKey);
        assert_eq!(repo.len().await, 1);
    }
}
