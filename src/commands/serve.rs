//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, InMemoryUserRepository, UserRepository, UserStore};
use crate::services::Services;

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    let (users, database): (Arc<dyn UserRepository>, Option<Arc<Database>>) = if args.ephemeral {
        tracing::warn!("Running with in-memory user store; accounts are lost on exit");
        (Arc::new(InMemoryUserRepository::new()), None)
    } else {
        let db = Database::connect(&config)
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Database connection failed: {}", e)))?;
        let users = Arc::new(UserStore::new(db.get_connection()));
        (users, Some(Arc::new(db)))
    };

    let services = Services::from_config(users, &config)?;
    let app = create_router(AppState::from_services(&services, database));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
