//! # Mobilia API Server
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ApiConfig::load ──► tracing ──► Database (+migrations)                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  bootstrap admin (optional) ──► AppState ──► axum::serve               │
//! │                                                   │                     │
//! │                                   Ctrl+C / SIGTERM ──► graceful stop    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mobilia_api::auth::hash_password;
use mobilia_api::mailer::LogMailer;
use mobilia_api::{create_router, ApiConfig, AppState};
use mobilia_core::validation::{validate_email, validate_password};
use mobilia_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::load().context("Failed to load configuration")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting Mobilia API server...");
    info!(
        bind = %config.bind_address(),
        database = %config.database_path,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.max_connections),
    )
    .await
    .context("Failed to open database")?;
    info!("Database ready");

    if let (Some(email), Some(password)) = (
        config.bootstrap_admin_email.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) {
        let email = validate_email(email).context("Invalid bootstrap admin email")?;
        validate_password(password).context("Invalid bootstrap admin password")?;
        let hash = hash_password(password).context("Failed to hash bootstrap admin password")?;
        db.users()
            .ensure_admin(&email, &hash)
            .await
            .context("Failed to create bootstrap admin")?;
    }

    let mailer = Arc::new(LogMailer::new(config.public_base_url.clone()));
    let bind = config.bind_address();
    let state = AppState::new(db.clone(), config, mailer);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(addr = %bind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
