//! Enterprise Discovery Library
//!
//! Auto-discovery of the databases hosted on an enterprise cluster.
//!
//! The library fetches the raw database listing from the cluster management
//! API, normalizes it into records a database GUI can present and connect to,
//! and reports the outcome of every discovery call through an event hook.
//!
//! # Features
//!
//! - **Normalization**: external endpoint selection, Active-Active name
//!   disambiguation, persistence policy classification, replica graph inference
//! - **Cluster client**: basic-auth REST client with credential/connection
//!   failure classification
//! - **Hooks**: pluggable module-name canonicalization and discovery events
//! - **Server**: axum endpoint consumed by the GUI
//!
//! # Quick Start
//!
//! ```no_run
//! use enterprise_discovery::{normalize, RawDatabaseDescriptor, RedisModuleNames};
//!
//! let payload = r#"[{"uid": 1, "name": "cache", "endpoints": []}]"#;
//! let raw: Vec<RawDatabaseDescriptor> = serde_json::from_str(payload).unwrap();
//! let databases = normalize(&raw, &RedisModuleNames).unwrap();
//! assert!(databases.is_empty());
//! ```

pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod module_names;
pub mod normalizer;
pub mod service;

// Re-export commonly used types
pub use crate::analytics::{DiscoveryEventSink, DiscoverySummary, TracingEventSink};
pub use crate::client::{ClusterApi, EnterpriseClusterClient};
pub use crate::config::{Args, DiscoveryConfig};
pub use crate::error::{DiscoveryError, Result};
pub use crate::models::{
    ClusterConnectionDetails, DatabaseOptions, NormalizedDatabase, PersistencePolicy,
    RawDatabaseDescriptor,
};
pub use crate::module_names::{ModuleNameMapper, RedisModuleNames};
pub use crate::normalizer::{find_replicas, normalize};
pub use crate::service::DiscoveryService;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        analytics::{DiscoveryEventSink, TracingEventSink},
        client::{ClusterApi, EnterpriseClusterClient},
        config::DiscoveryConfig,
        models::{ClusterConnectionDetails, NormalizedDatabase, RawDatabaseDescriptor},
        module_names::{ModuleNameMapper, RedisModuleNames},
        normalizer::normalize,
        service::DiscoveryService,
        DiscoveryError, Result,
    };
}
