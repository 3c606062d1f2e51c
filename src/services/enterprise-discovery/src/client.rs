//! Cluster management API client
//!
//! Fetches the raw database listing from a cluster and classifies transport
//! failures before any normalization happens.

use crate::config::ClusterClientConfig;
use crate::error::{DiscoveryError, Result};
use crate::models::{ClusterConnectionDetails, RawDatabaseDescriptor};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Source of raw database descriptors
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List every database known to the cluster
    async fn list_databases(
        &self,
        details: &ClusterConnectionDetails,
    ) -> Result<Vec<RawDatabaseDescriptor>>;
}

/// `reqwest`-based client for the cluster REST API
#[derive(Debug, Clone)]
pub struct EnterpriseClusterClient {
    http_client: Client,
    config: ClusterClientConfig,
}

impl EnterpriseClusterClient {
    /// Create a new cluster client
    pub fn new(config: ClusterClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| DiscoveryError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// URL of the database listing for the given cluster
    pub fn databases_url(&self, details: &ClusterConnectionDetails) -> String {
        format!(
            "{}://{}:{}{}",
            self.config.scheme, details.host, details.port, self.config.databases_path
        )
    }
}

#[async_trait]
impl ClusterApi for EnterpriseClusterClient {
    async fn list_databases(
        &self,
        details: &ClusterConnectionDetails,
    ) -> Result<Vec<RawDatabaseDescriptor>> {
        let address = details.address();
        let url = self.databases_url(details);
        debug!(url = %url, "Requesting cluster databases");

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&details.username, Some(&details.password))
            .send()
            .await
            .map_err(|e| DiscoveryError::connection(&address, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &address));
        }

        let databases: Vec<RawDatabaseDescriptor> = response.json().await.map_err(|e| {
            DiscoveryError::connection(&address, format!("Unreadable response body: {}", e))
        })?;

        info!(
            address = %address,
            count = databases.len(),
            "Fetched cluster databases"
        );

        Ok(databases)
    }
}

/// Map a non-success HTTP status from the cluster to a discovery error
pub fn classify_status(status: u16, address: &str) -> DiscoveryError {
    match status {
        401 | 403 => DiscoveryError::credentials(address),
        other => DiscoveryError::connection(address, format!("Cluster responded with HTTP {}", other)),
    }
}
