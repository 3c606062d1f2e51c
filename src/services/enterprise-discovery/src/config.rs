//! Enterprise Discovery Configuration Module
//!
//! Loads the server configuration from built-in defaults, YAML files,
//! environment variables and command-line arguments, in that order.

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main enterprise discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Cluster API client configuration
    pub cluster: ClusterClientConfig,

    /// Monitoring configuration
    pub monitoring: MonitoringConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,
}

impl ServerConfig {
    /// Get the server socket address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("Invalid server address")
    }
}

/// Cluster management API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterClientConfig {
    /// URL scheme of the management API
    pub scheme: String,

    /// Path of the database listing
    pub databases_path: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Accept self-signed cluster certificates
    pub accept_invalid_certs: bool,
}

impl Default for ClusterClientConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            databases_path: "/v1/bdbs".to_string(),
            request_timeout: 30,
            accept_invalid_certs: true,
        }
    }
}

/// Monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive
    pub level: String,

    /// Log format (json or pretty)
    pub format: String,
}

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "enterprise-discovery-server",
    about = "Enterprise cluster database auto-discovery service",
    version
)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/enterprise-discovery.yaml")]
    pub config: PathBuf,

    /// Environment (development, production)
    #[arg(short, long, default_value = "development")]
    pub environment: String,

    /// Server port (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level (overrides config)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Cluster request timeout in seconds (overrides config)
    #[arg(long)]
    pub cluster_timeout: Option<u64>,
}

impl DiscoveryConfig {
    /// Load configuration from defaults, files and environment variables
    pub fn load(args: &Args) -> Result<Self> {
        let mut settings = config::Config::builder().add_source(
            config::Config::try_from(&DiscoveryConfig::default())
                .context("Failed to seed default configuration")?,
        );

        if args.config.exists() {
            settings = settings.add_source(config::File::from(args.config.clone()).required(false));
        }

        let env_file = format!("config/enterprise-discovery-{}.yaml", args.environment);
        settings = settings.add_source(config::File::with_name(&env_file).required(false));

        settings = settings
            .add_source(config::Environment::with_prefix("ENTERPRISE_DISCOVERY").separator("__"));

        let mut config: DiscoveryConfig = settings
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if let Some(port) = args.port {
            config.server.port = port;
        }

        if let Some(ref log_level) = args.log_level {
            config.monitoring.logging.level = log_level.clone();
        }

        if args.debug {
            config.monitoring.logging.level = "debug".to_string();
        }

        if let Some(timeout) = args.cluster_timeout {
            config.cluster.request_timeout = timeout;
        }

        config
            .validate()
            .context("Configuration validation failed")?;

        Ok(config)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if !matches!(self.cluster.scheme.as_str(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "Invalid cluster scheme: {}. Valid schemes: http, https",
                self.cluster.scheme
            ));
        }

        if !self.cluster.databases_path.starts_with('/') {
            return Err(anyhow::anyhow!(
                "Cluster databases path must start with '/'"
            ));
        }

        if self.cluster.request_timeout == 0 {
            return Err(anyhow::anyhow!(
                "Cluster request timeout must be greater than 0"
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.monitoring.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Valid formats: {:?}",
                self.monitoring.logging.format,
                valid_formats
            ));
        }

        Ok(())
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5540,
            },
            cluster: ClusterClientConfig::default(),
            monitoring: MonitoringConfig {
                logging: LoggingConfig {
                    level: "info".to_string(),
                    format: "json".to_string(),
                },
            },
        }
    }
}
