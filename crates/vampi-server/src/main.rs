//! `VAmPI` server entry point.
//!
//! Resolves configuration, opens the store, and runs the bootstrap sequence
//! to completion before the listener binds. A failed bootstrap aborts the
//! process; the server never serves against a store in an unknown state.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use vampi_server::config::{ServerConfig, StorageBackendType};
use vampi_server::routes;
use vampi_server::state::AppState;
use vampi_storage::{MemoryStore, StoreHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        port = config.runtime.listen_port,
        vulnerable = config.runtime.vulnerable_mode,
        storage = ?config.storage_backend,
        "VAmPI starting"
    );

    let store = open_store(&config).await?;
    let state = Arc::new(AppState::new(config.runtime.clone(), store));

    let outcome = state
        .sequencer
        .ensure_ready(&state.config)
        .await
        .context("database bootstrap failed")?;
    info!(?outcome, "database ready");

    let app = routes::app(Arc::clone(&state));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "VAmPI server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("VAmPI server stopped");
    Ok(())
}

/// Open the configured store backend.
async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn StoreHandle>> {
    let store: Arc<dyn StoreHandle> = match &config.storage_backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (data will not persist)");
            Arc::new(MemoryStore::new())
        }
        #[cfg(feature = "postgres-backend")]
        StorageBackendType::Postgres { url } => {
            info!(url = %"[redacted]", "using PostgreSQL storage");
            Arc::new(
                vampi_storage::PostgresStore::connect(url)
                    .await
                    .context("failed to connect to PostgreSQL storage")?,
            )
        }
        #[cfg(not(feature = "postgres-backend"))]
        StorageBackendType::Postgres { .. } => {
            anyhow::bail!(
                "PostgreSQL backend requested but feature 'postgres-backend' is not enabled"
            );
        }
    };
    Ok(store)
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
