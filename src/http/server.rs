//! Demo HTTP server.
//!
//! # Responsibilities
//! - Create the Axum Router with the demo handlers
//! - Wire up middleware (B3 tracing, request logging, timeout)
//! - Serve plain HTTP, or HTTPS when `[server.tls]` is set, until the
//!   shutdown signal fires

use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// How long in-flight HTTPS connections get to finish after shutdown.
const TLS_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

use crate::config::AppConfig;
use crate::http::handlers::{self, AppState};
use crate::http::tls;
use crate::middleware::{HttpTracing, ZipkinLayer};
use crate::trace::Tracer;

/// HTTP server exposing the demo routes behind the tracing middleware.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and tracer.
    pub fn new(config: AppConfig, tracer: Tracer) -> Self {
        let tracing = HttpTracing::from_config(tracer, &config.tracing);
        let state = AppState {
            tracer: tracing.tracer().clone(),
        };
        let router = Self::build_router(&config, state, tracing);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState, tracing: HttpTracing) -> Router {
        Router::new()
            .route("/foo", post(handlers::deferred))
            .route("/status/{code}", get(handlers::status))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(ZipkinLayer::new(tracing))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service_name = %self.config.tracing.service_name,
            "HTTP server starting"
        );

        match self.config.server.tls.clone() {
            Some(tls_config) => {
                let rustls = tls::load_tls_config(&tls_config).await?;
                let handle = axum_server::Handle::new();
                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    tracing::info!("Shutdown signal received");
                    shutdown_handle.graceful_shutdown(Some(TLS_SHUTDOWN_GRACE));
                });

                tracing::info!(address = %addr, "Serving HTTPS");
                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                        tracing::info!("Shutdown signal received");
                    })
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
