//! Enterprise Discovery Server
//!
//! Main entry point for the enterprise cluster auto-discovery service.

use anyhow::{Context, Result};
use clap::Parser;
use enterprise_discovery::{
    config::{Args, DiscoveryConfig},
    handlers::{create_router, AppState},
    DiscoveryService, EnterpriseClusterClient, RedisModuleNames, TracingEventSink,
};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

/// Telemetry and observability setup
mod telemetry {
    use anyhow::Result;
    use enterprise_discovery::config::DiscoveryConfig;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    /// Initialize tracing and logging
    pub fn init_tracing(config: &DiscoveryConfig) -> Result<()> {
        let log_level = &config.monitoring.logging.level;
        let log_format = &config.monitoring.logging.format;

        let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = match log_format.as_str() {
            "json" => fmt::layer().json().with_target(true).boxed(),
            _ => fmt::layer().pretty().boxed(),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}

/// Graceful shutdown handling
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Arc::new(DiscoveryConfig::load(&args)?);

    telemetry::init_tracing(&config)?;

    info!(
        "Starting Enterprise Discovery Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Configuration loaded from: {:?}", args.config);

    let cluster = EnterpriseClusterClient::new(config.cluster.clone())
        .context("Failed to initialize cluster client")?;

    let discovery = DiscoveryService::new(
        Arc::new(cluster),
        Arc::new(RedisModuleNames),
        Arc::new(TracingEventSink),
    );

    let app = create_router(AppState {
        discovery: Arc::new(discovery),
    });

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to server address")?;

    info!("Enterprise Discovery Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed to start")?;

    info!("Enterprise Discovery Server shutdown complete");
    Ok(())
}
