//! Demo server for the B3 tracing middleware.
//!
//! Serves a few routes behind `ZipkinLayer` and logs every annotation through
//! `LoggingRecorder`.
//!
//! The explicit context provider is a single shared slot, so the server runs
//! on a current-thread runtime.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use zipkin_middleware::config::{self, AppConfig};
use zipkin_middleware::http::HttpServer;
use zipkin_middleware::lifecycle::Shutdown;
use zipkin_middleware::observability::{logging, metrics};
use zipkin_middleware::{ExplicitContext, LoggingRecorder, Tracer};

#[derive(Parser)]
#[command(name = "zipkin-demo")]
#[command(about = "Demo HTTP server traced with B3 propagation", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `tracing.service_name`.
    #[arg(short, long)]
    service_name: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(service_name) = cli.service_name {
        config.tracing.service_name = service_name;
    }
    config::validation::validate_config(&config).map_err(config::ConfigError::Validation)?;

    logging::init(&config.observability.log_level)?;
    tracing::info!("zipkin-demo v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let tracer = Tracer::new(LoggingRecorder, ExplicitContext::new());
    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config, tracer);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
