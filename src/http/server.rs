//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout)
//! - Serve the JSON snapshot, the live websocket and the static dashboard
//! - Stop on the shared shutdown signal

use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::health::StateStore;
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::http::{status, websocket};
use crate::push::Broadcaster;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
    pub broadcaster: Arc<Broadcaster>,
    /// Upper bound for one websocket write.
    pub write_timeout: Duration,
}

/// HTTP server for the status dashboard.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the shared store and broadcaster.
    pub fn new(
        config: ServiceConfig,
        store: Arc<StateStore>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        let state = AppState {
            store,
            broadcaster,
            write_timeout: config.subscribers.write_timeout(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let static_files = ServeDir::new(&config.dashboard.static_dir)
            .append_index_html_on_directories(true);

        Router::new()
            .route("/status-json", get(status::status_json))
            .route("/ws", get(websocket::ws_handler))
            .fallback_service(static_files)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "http",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id_of(request),
                        )
                    }))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server, accepting connections on the given listener until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            static_dir = %self.config.dashboard.static_dir.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
