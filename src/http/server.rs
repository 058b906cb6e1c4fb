//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the quote and health handlers
//! - Wire up middleware (request ID, tracing, outer request timeout)
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ServerConfig, ServiceConfig, TimeoutConfig};
use crate::http::quote::get_quote;
use crate::http::request::{request_id, MakeRequestUuid};
use crate::http::status::get_health;
use crate::resilience::QuoteFetcher;
use crate::storage::QuoteStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn QuoteFetcher>,
    pub store: Arc<dyn QuoteStore>,
    pub timeouts: TimeoutConfig,
    pub server: ServerConfig,
}

/// HTTP server for the quote service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around a fetcher and a store.
    pub fn new(
        config: ServiceConfig,
        fetcher: Arc<dyn QuoteFetcher>,
        store: Arc<dyn QuoteStore>,
    ) -> Self {
        let state = AppState {
            fetcher,
            store,
            timeouts: config.timeouts.clone(),
            server: config.server.clone(),
        };

        Self {
            router: Self::build_router(&config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        // Outermost first: the request ID exists before the trace span opens.
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .route("/cotacao", get(get_quote))
            .route("/health", get(get_health))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
