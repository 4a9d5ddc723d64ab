//! Gallery API - accounts and sessions for the photo gallery.
//!
//! Registers users, validates their credentials and issues signed,
//! expiring session tokens. Everything that leaves the crate carries a
//! sanitized identity; password hashes never do.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: User entity, sanitized identity and password hashing
//! - **services**: Registration, login, credential validation and tokens
//! - **infra**: Database, migrations and user repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server against Postgres
//! cargo run -- serve
//!
//! # Start the server with an in-memory user store
//! cargo run -- serve --ephemeral
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{User, UserIdentity};
pub use errors::{AppError, AppResult};
pub use services::{AuthService, AuthSession, Services};
