//! Session token issuance and verification (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{TokenSettings, TOKEN_TYPE_BEARER};
use crate::errors::{AppError, AppResult};

/// Custom claims carried alongside the registered ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub session: SessionClaims,
}

/// A freshly signed session token
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedToken {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Instant after which the token is rejected
    pub expires_at: DateTime<Utc>,
    /// Token lifetime in seconds
    #[schema(example = 604800)]
    pub expires_in: i64,
}

/// Signs and checks session tokens.
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `user_id` that expires after the configured lifetime.
    fn issue(&self, user_id: Uuid, claims: SessionClaims) -> AppResult<IssuedToken>;

    /// Check signature and expiry, returning the claims of a valid token.
    fn verify(&self, token: &str) -> AppResult<Claims>;
}

/// JWT implementation of [`TokenIssuer`] keyed by a process-wide secret.
pub struct JwtTokenIssuer {
    settings: TokenSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenIssuer {
    /// Build the signing and verification keys once.
    pub fn new(settings: TokenSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            settings,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    fn issue_at(
        &self,
        user_id: Uuid,
        session: SessionClaims,
        now: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        let expires_at = now
            .checked_add_signed(self.settings.lifetime)
            .ok_or_else(|| AppError::internal("Token expiry is out of range"))?;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            session,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_at,
            expires_in: self.settings.lifetime.num_seconds(),
        })
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: Uuid, claims: SessionClaims) -> AppResult<IssuedToken> {
        self.issue_at(user_id, claims, Utc::now())
    }

    fn verify(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
