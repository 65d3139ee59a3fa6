//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the axum Router and hand every request to the dispatcher
//! - Wire up middleware (tracing)
//! - Bind the server to a listener and serve until shutdown
//!
//! # Design Decisions
//! - axum's own router carries a single catch-all; all path logic lives in
//!   the dispatch layer where pattern order is explicit
//! - No request timeout layer: event-stream responses are long-lived by
//!   design and the heartbeat announces liveness instead

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api::supervisor_routes;
use crate::clock::Clock;
use crate::config::SupervisorConfig;
use crate::domain::Plant;
use crate::routing::Dispatcher;

/// Application state injected into the catch-all handler.
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the supervisor API.
pub struct SupervisorServer {
    router: Router,
    config: SupervisorConfig,
}

impl SupervisorServer {
    /// Assemble the route table for `plant` and wrap it in an axum app.
    pub fn new(config: SupervisorConfig, plant: Arc<dyn Plant>, clock: Arc<dyn Clock>) -> Self {
        let dispatcher = Arc::new(supervisor_routes(plant, clock, &config.api));
        let state = AppState { dispatcher };
        let router = Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener, until
    /// ctrl-c.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.config.api.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run without a shutdown signal; the caller drops the task to stop.
    /// Used by integration tests.
    pub async fn serve(self, listener: TcpListener) -> Result<(), std::io::Error> {
        axum::serve(listener, self.router).await
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }
}

/// Catch-all handler feeding the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.dispatcher.dispatch(request).await
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
