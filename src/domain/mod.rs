//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod password;
pub mod user;

pub use password::{Argon2Hasher, PasswordHasher};
pub use user::{normalize_email, User, UserIdentity};
