pub mod api; // HTTP surface for the PDA front-end
pub mod client; // Typed client for the same API
pub mod config;
pub mod core_state;
pub mod db;
pub mod input; // Scanner buffering + key relay
pub mod inspection;
pub mod models;
pub mod qualification;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::core_state::CoreState;

/// Install the global tracing subscriber. `RUST_LOG` wins over the built-in
/// default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Open the database, serve the API and block until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), String> {
    tracing::info!(
        bind_addr = %config.bind_addr,
        db_path = %config.db_path.display(),
        "{} starting v{}",
        config::APP_NAME,
        config::APP_VERSION
    );

    let core = CoreState::open(&config.db_path)
        .map_err(|e| format!("Cannot open inspection database: {e}"))?;
    let server = api::start_api_server(Arc::new(core), config.bind_addr).await?;
    tracing::info!(addr = %server.local_addr(), "Inspection API listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }
    server.stop().await;
    Ok(())
}
