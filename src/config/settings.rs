//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;

use super::constants::{
    DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_PARALLELISM,
    DEFAULT_DATABASE_URL, DEFAULT_DB_CONNECT_RETRIES, DEFAULT_DB_CONNECT_RETRY_DELAY_MS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TOKEN_LIFETIME, DEV_JWT_SECRET,
    MAX_TOKEN_LIFETIME_DAYS, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Session token signing settings.
#[derive(Clone)]
pub struct TokenSettings {
    secret: String,
    /// How long an issued token stays valid
    pub lifetime: Duration,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenSettings {
    /// Build token settings, rejecting short secrets and lifetimes that are
    /// non-positive or longer than `MAX_TOKEN_LIFETIME_DAYS`.
    pub fn new(secret: impl Into<String>, lifetime: Duration) -> AppResult<Self> {
        let secret = secret.into();
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if lifetime <= Duration::zero() {
            return Err(AppError::config("token lifetime must be positive"));
        }
        if lifetime > Duration::days(MAX_TOKEN_LIFETIME_DAYS) {
            return Err(AppError::config(format!(
                "token lifetime must not exceed {} days",
                MAX_TOKEN_LIFETIME_DAYS
            )));
        }
        Ok(Self { secret, lifetime })
    }

    /// Get secret bytes for token signing/verification.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            iterations: DEFAULT_ARGON2_ITERATIONS,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_connect_retries: u32,
    pub db_connect_retry_delay: StdDuration,
    pub token: TokenSettings,
    pub hashing: HashingSettings,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("db_connect_retries", &self.db_connect_retries)
            .field("db_connect_retry_delay", &self.db_connect_retry_delay)
            .field("token", &self.token)
            .field("hashing", &self.hashing)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `JWT_SECRET` is mandatory in release builds; debug builds fall back to
    /// an insecure development key with a warning.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::config(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let raw_lifetime =
            env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_TOKEN_LIFETIME.to_string());
        let lifetime = parse_lifetime(&raw_lifetime).ok_or_else(|| {
            AppError::config(format!("JWT_EXPIRES_IN has an invalid value: {}", raw_lifetime))
        })?;

        let defaults = HashingSettings::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            db_connect_retries: env_or("DB_CONNECT_RETRIES", DEFAULT_DB_CONNECT_RETRIES),
            db_connect_retry_delay: StdDuration::from_millis(env_or(
                "DB_CONNECT_RETRY_DELAY_MS",
                DEFAULT_DB_CONNECT_RETRY_DELAY_MS,
            )),
            token: TokenSettings::new(jwt_secret, lifetime)?,
            hashing: HashingSettings {
                memory_kib: env_or("ARGON2_MEMORY_KIB", defaults.memory_kib),
                iterations: env_or("ARGON2_ITERATIONS", defaults.iterations),
                parallelism: env_or("ARGON2_PARALLELISM", defaults.parallelism),
            },
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse a lifetime such as `7d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_lifetime(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c.to_ascii_lowercase()),
        Some(_) => (raw, 's'),
        None => return None,
    };

    let amount: i64 = digits.trim().parse().ok()?;
    let seconds = match unit {
        's' => Some(amount),
        'm' => amount.checked_mul(60),
        'h' => amount.checked_mul(3_600),
        'd' => amount.checked_mul(86_400),
        _ => None,
    }?;

    Duration::try_seconds(seconds).filter(|d| *d > Duration::zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lifetime_units() {
        assert_eq!(parse_lifetime("7d"), Some(Duration::days(7)));
        assert_eq!(parse_lifetime("12h"), Some(Duration::hours(12)));
        assert_eq!(parse_lifetime("30m"), Some(Duration::minutes(30)));
        assert_eq!(parse_lifetime("45s"), Some(Duration::seconds(45)));
        assert_eq!(parse_lifetime("3600"), Some(Duration::hours(1)));
        assert_eq!(parse_lifetime(" 2D "), Some(Duration::days(2)));
    }

    #[test]
    fn test_parse_lifetime_rejects_garbage() {
        assert_eq!(parse_lifetime(""), None);
        assert_eq!(parse_lifetime("d"), None);
        assert_eq!(parse_lifetime("7w"), None);
        assert_eq!(parse_lifetime("abc"), None);
        assert_eq!(parse_lifetime("0"), None);
        assert_eq!(parse_lifetime("-5m"), None);
    }

    #[test]
    fn test_default_lifetime_is_seven_days() {
        assert_eq!(parse_lifetime(DEFAULT_TOKEN_LIFETIME), Some(Duration::days(7)));
    }

    #[test]
    fn test_token_settings_validation() {
        assert!(TokenSettings::new("short", Duration::hours(1)).is_err());
        assert!(TokenSettings::new(DEV_JWT_SECRET, Duration::zero()).is_err());

        let settings = TokenSettings::new(DEV_JWT_SECRET, Duration::hours(1)).unwrap();
        assert_eq!(settings.secret_bytes(), DEV_JWT_SECRET.as_bytes());
    }

    #[test]
    fn test_oversized_lifetime_rejected() {
        for raw in ["100000000d", "9000000000000"] {
            let lifetime = parse_lifetime(raw).expect("parses as a duration");
            let result = TokenSettings::new(DEV_JWT_SECRET, lifetime);
            assert!(matches!(result, Err(AppError::Config(_))), "{} accepted", raw);
        }

        let ceiling = Duration::days(MAX_TOKEN_LIFETIME_DAYS);
        assert!(TokenSettings::new(DEV_JWT_SECRET, ceiling).is_ok());
        assert!(TokenSettings::new(DEV_JWT_SECRET, ceiling + Duration::seconds(1)).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = TokenSettings::new(DEV_JWT_SECRET, Duration::hours(1)).unwrap();
        let rendered = format!("{:?}", settings);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(DEV_JWT_SECRET));
    }
}
