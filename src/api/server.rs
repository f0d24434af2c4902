//! Inspection API server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::router::api_router;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Session metadata for a running API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Signal a graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!(session_id = %self.session.session_id, "API server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for in-flight requests to drain.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }

    pub fn local_addr(&self) -> String {
        self.session.server_addr.clone()
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` (port 0 picks an ephemeral port) and serve the inspection
/// API in a background tokio task.
pub async fn start_api_server(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = api_router(core);

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn loopback() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_core() -> Arc<CoreState> {
        Arc::new(CoreState::in_memory().unwrap())
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let server = start_api_server(test_core(), loopback())
            .await
            .expect("server should start");

        assert!(!server.session.session_id.is_empty());
        assert!(server.session.port > 0);

        let url = format!("http://127.0.0.1:{}/api/health", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.stop().await;
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = start_api_server(test_core(), loopback())
            .await
            .expect("server should start");

        let url = format!("http://{}/nonexistent", server.local_addr());
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.stop().await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_api_server(test_core(), loopback())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown();
        server.stop().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let server = start_api_server(test_core(), loopback()).await.unwrap();
        let taken: SocketAddr = server.local_addr().parse().unwrap();
        let err = start_api_server(test_core(), taken).await.err().unwrap();
        assert!(err.contains("Failed to bind"));
        server.stop().await;
    }
}
