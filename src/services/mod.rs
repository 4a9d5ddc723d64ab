//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod container;
mod login_user;
mod register_user;
pub mod token;
mod user_service;
mod validate_credentials;

// Service Container
pub use container::{ServiceContainer, Services};

// Facade and use cases
pub use auth_service::{AuthService, AuthSession, Authenticator};
pub use login_user::LoginUser;
pub use register_user::RegisterUser;
pub use validate_credentials::ValidateCredentials;

// Collaborators
pub use token::{Claims, IssuedToken, JwtTokenIssuer, SessionClaims, TokenIssuer};
pub use user_service::{UserManager, UserService};

use crate::errors::{AppError, AppResult};

/// Run CPU-bound work (password hashing) off the async executor.
async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::internal(format!("Blocking task failed: {}", e)))?
}
