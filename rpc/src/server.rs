//! Axum-based API server.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::broadcast;
use tracing::info;

use chainwatch_watcher::WatcherService;

use crate::error::RpcError;
use crate::handlers::{self, ApiState};

/// The chainwatch HTTP API server.
pub struct RpcServer {
    pub port: u16,
    state: Arc<ApiState>,
    serve_metrics: bool,
}

impl RpcServer {
    /// Create a server exposing `service` on `port`.
    pub fn new(port: u16, service: Arc<WatcherService>, serve_metrics: bool) -> Self {
        Self {
            port,
            state: Arc::new(ApiState { service }),
            serve_metrics,
        }
    }

    /// Build the router. Split out from [`start`](Self::start) so tests can
    /// exercise routing without binding a socket.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/subscribe", post(handlers::subscribe))
            .route("/transactions", get(handlers::transactions))
            .route("/currentBlock", get(handlers::current_block));
        if self.serve_metrics {
            router = router.route("/metrics", get(handlers::metrics));
        }
        router.with_state(Arc::clone(&self.state))
    }

    /// Bind and serve until `shutdown_rx` fires, then drain connections.
    pub async fn start(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<(), RpcError> {
        let app = self.router();
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        info!("API server listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
