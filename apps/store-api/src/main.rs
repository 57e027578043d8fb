//! # Store API
//!
//! HTTP server binary.
//!
//! ## Startup
//! ```text
//! tracing ──► ApiConfig::load ──► Database::new (+ migrations) ──► axum::serve
//!                                                                     │
//!                                          Ctrl+C / SIGTERM ──► graceful shutdown
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use store_api::{build_router, ApiConfig, AppState};
use store_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,store_api=debug")),
        )
        .with_target(true)
        .init();

    info!("Starting Store API server...");

    let config = ApiConfig::load().context("failed to load configuration")?;
    info!(
        port = config.port,
        base_url = %config.base_url,
        db = %config.db_conn,
        "Configuration loaded"
    );

    let db_config =
        DbConfig::new(&config.db_conn).max_connections(config.db_max_open_connection);
    let db = Database::new(db_config)
        .await
        .context("failed to open database")?;

    let state = AppState::new(db.clone());
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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
