//! Discovery service
//!
//! Composes the cluster client, the normalizer and the event sink into the
//! single operation the GUI calls.

use crate::analytics::DiscoveryEventSink;
use crate::client::ClusterApi;
use crate::error::Result;
use crate::models::{ClusterConnectionDetails, NormalizedDatabase};
use crate::module_names::ModuleNameMapper;
use crate::normalizer::normalize;

use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

/// Enterprise cluster discovery
#[derive(Clone)]
pub struct DiscoveryService {
    cluster: Arc<dyn ClusterApi>,
    module_names: Arc<dyn ModuleNameMapper>,
    events: Arc<dyn DiscoveryEventSink>,
}

impl DiscoveryService {
    pub fn new(
        cluster: Arc<dyn ClusterApi>,
        module_names: Arc<dyn ModuleNameMapper>,
        events: Arc<dyn DiscoveryEventSink>,
    ) -> Self {
        Self {
            cluster,
            module_names,
            events,
        }
    }

    /// Fetch and normalize the databases of a cluster.
    ///
    /// Exactly one event is emitted once the request passes validation.
    pub async fn get_databases(
        &self,
        details: &ClusterConnectionDetails,
    ) -> Result<Vec<NormalizedDatabase>> {
        details.validate()?;

        let address = details.address();
        info!(address = %address, "Getting cluster databases");

        match self.discover(details).await {
            Ok(databases) => {
                info!(
                    address = %address,
                    count = databases.len(),
                    "Succeeded to get cluster databases"
                );
                self.events.on_discovery_succeeded(&databases);
                Ok(databases)
            }
            Err(e) => {
                error!(address = %address, "Failed to get cluster databases: {}", e);
                self.events.on_discovery_failed(&e);
                Err(e)
            }
        }
    }

    async fn discover(&self, details: &ClusterConnectionDetails) -> Result<Vec<NormalizedDatabase>> {
        let raw = self.cluster.list_databases(details).await?;
        normalize(&raw, self.module_names.as_ref())
    }
}
