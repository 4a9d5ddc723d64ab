//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// User aggregate root.
///
/// Deliberately not `Serialize`: the only way out of the authentication
/// subsystem is through [`UserIdentity`].
#[derive(Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl User {
    /// Create a new user with a fresh identifier and timestamps
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Strip the password hash, producing the shape safe to hand to callers.
    pub fn sanitize(self) -> UserIdentity {
        UserIdentity::from(self)
    }
}

/// Sanitized identity: a user without its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserIdentity {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "ann@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "Ann")]
    pub name: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserIdentity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Canonical form of an email address used for storage and lookup.
///
/// Addresses are compared case-insensitively: `Ann@X.com` and `ann@x.com`
/// name the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new(
            "a@x.com".to_string(),
            "$argon2id$secret-hash".to_string(),
            "Ann".to_string(),
        )
    }

    #[test]
    fn test_new_user_timestamps_match() {
        let user = sample();
        assert_eq!(user.created_at, user.updated_at);
        assert!(!user.id.is_nil());
    }

    #[test]
    fn test_sanitize_drops_hash() {
        let user = sample();
        let id = user.id;
        let identity = user.sanitize();

        assert_eq!(identity.id, id);
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.name, "Ann");

        let json = serde_json::to_value(&identity).unwrap();
        let fields = json.as_object().unwrap();
        assert!(!fields.contains_key("password_hash"));
        assert!(!fields.contains_key("password"));
        assert!(!json.to_string().contains("secret-hash"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret-hash"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }
}
