//! HTTP embedding layer.
//!
//! # Responsibilities
//! - Create the Axum router exposing the scrape endpoint
//! - Wire up middleware (tracing)
//! - Serve until the host's shutdown future resolves
//!
//! The monitor itself runs independently of this server; the router only
//! reads the registry snapshot.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::monitor::Monitor;

/// Prometheus text exposition content type.
const TEXT_EXPOSITION: &str = "text/plain; version=0.0.4";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<Monitor>,
}

/// HTTP server hosting the scrape endpoint.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around the given monitor handle.
    pub fn new(monitor: Arc<Monitor>) -> Self {
        let state = AppState { monitor };
        let router = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Scrape handler: renders the current registry snapshot.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.monitor.metrics().render();
    ([(header::CONTENT_TYPE, TEXT_EXPOSITION)], body)
}
