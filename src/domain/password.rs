//! Password hashing - one-way digests and constant-time verification.
//!
//! The digest is a PHC string (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so the cost parameters travel with every stored hash and older hashes keep
//! verifying after the configured cost changes.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::config::HashingSettings;
use crate::errors::{AppError, AppResult};

/// Plaintext hashed once at startup to produce the decoy digest
const DECOY_PLAINTEXT: &str = "decoy-password-never-issued";

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest of `plaintext`.
    fn hash(&self, plaintext: &str) -> AppResult<String>;

    /// Check `plaintext` against a stored digest.
    ///
    /// Returns `false` for a mismatch and for a digest that cannot be parsed.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;

    /// A well-formed digest no user owns, verified in place of a real one when
    /// the account does not exist so both paths cost the same.
    fn decoy_digest(&self) -> &str;
}

/// Argon2id hasher with configurable cost.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    decoy: String,
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl Argon2Hasher {
    /// Build a hasher from cost settings.
    ///
    /// # Errors
    /// Returns a configuration error if the parameters are outside Argon2's limits.
    pub fn new(settings: &HashingSettings) -> AppResult<Self> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| AppError::config(format!("Invalid Argon2 parameters: {}", e)))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = hash_with(&argon2, DECOY_PLAINTEXT)?;

        Ok(Self { argon2, decoy })
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> AppResult<String> {
        hash_with(&self.argon2, plaintext)
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    fn decoy_digest(&self) -> &str {
        &self.decoy
    }
}

fn hash_with(argon2: &Argon2<'_>, plaintext: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))
}
