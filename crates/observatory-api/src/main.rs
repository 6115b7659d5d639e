//! Observatory server binary.
//!
//! Wires configuration, the store client and the HTTP server together.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `observatory.toml`, `.env` and the environment
//! 3. Connect the observation store (and run migrations)
//! 4. Serve HTTP until `Ctrl-C` / `SIGTERM`
//! 5. Close the store

use std::sync::Arc;

use observatory_api::config::{AppConfig, ConfigError, StoreKind};
use observatory_api::server::{ServerConfig, start_server};
use observatory_api::state::AppState;
use observatory_db::{MemoryObservationStore, ObservationStore, PgObservationStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the store connection or the server
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("observatory starting");

    // 2. Load configuration.
    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Configuration invalid");
    })?;
    info!(
        host = config.host,
        port = config.port,
        store = ?config.store,
        admin_enabled = config.admin_key().is_some(),
        "Configuration loaded"
    );

    // 3. Connect the store.
    let store = connect_store(&config).await?;

    let mut state = AppState::new(Arc::clone(&store));
    if let Some(key) = config.admin_key() {
        state = state.with_admin_key(key);
    }

    // 4. Serve until shutdown.
    let server_config = ServerConfig {
        host: config.host.clone(),
        port: config.port,
    };
    let served = start_server(&server_config, Arc::new(state)).await;

    // 5. Release the store whether or not serving succeeded.
    store.close().await;

    if let Err(e) = &served {
        tracing::error!(error = %e, "Server exited with error");
    }
    served?;

    info!("observatory stopped");
    Ok(())
}

/// Build the configured store client.
async fn connect_store(
    config: &AppConfig,
) -> Result<Arc<dyn ObservationStore>, Box<dyn std::error::Error>> {
    match config.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; observations are lost on exit");
            Ok(Arc::new(MemoryObservationStore::new()))
        }
        StoreKind::Postgres => {
            let pg_config = config.postgres().ok_or(ConfigError::MissingDatabaseUrl)?;
            let store = PgObservationStore::connect(&pg_config)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Store connection failed"))?;
            Ok(Arc::new(store))
        }
    }
}
