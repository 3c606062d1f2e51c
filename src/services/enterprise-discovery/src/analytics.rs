//! Discovery events
//!
//! Every discovery call reports its outcome exactly once through a
//! [`DiscoveryEventSink`]. The default sink records a structured tracing event.

use crate::error::DiscoveryError;
use crate::models::NormalizedDatabase;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Status string the cluster reports for a serving database
pub const ACTIVE_STATUS: &str = "active";

/// Receives the outcome of each discovery call
pub trait DiscoveryEventSink: Send + Sync {
    fn on_discovery_succeeded(&self, databases: &[NormalizedDatabase]);

    fn on_discovery_failed(&self, error: &DiscoveryError);
}

/// Aggregate numbers of a successful discovery
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverySummary {
    pub total_number_of_databases: usize,
    pub number_of_active_databases: usize,
    pub number_of_active_active_databases: usize,
}

impl DiscoverySummary {
    pub fn from_databases(databases: &[NormalizedDatabase]) -> Self {
        Self {
            total_number_of_databases: databases.len(),
            number_of_active_databases: databases
                .iter()
                .filter(|db| db.status == ACTIVE_STATUS)
                .count(),
            number_of_active_active_databases: databases
                .iter()
                .filter(|db| db.options.active_active_enabled)
                .count(),
        }
    }
}

/// Sink that logs discovery outcomes under the `analytics` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl DiscoveryEventSink for TracingEventSink {
    fn on_discovery_succeeded(&self, databases: &[NormalizedDatabase]) {
        let summary = DiscoverySummary::from_databases(databases);
        info!(
            target: "analytics",
            event = "CLUSTER_AUTODISCOVERY_SUCCEEDED",
            total_number_of_databases = summary.total_number_of_databases,
            number_of_active_databases = summary.number_of_active_databases,
            number_of_active_active_databases = summary.number_of_active_active_databases,
            "Cluster auto-discovery succeeded"
        );
    }

    fn on_discovery_failed(&self, error: &DiscoveryError) {
        warn!(
            target: "analytics",
            event = "CLUSTER_AUTODISCOVERY_FAILED",
            error_code = error.error_code(),
            error_message = %error,
            "Cluster auto-discovery failed"
        );
    }
}
