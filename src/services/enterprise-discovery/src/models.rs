//! Enterprise Discovery Models
//!
//! Raw database descriptors as returned by the cluster management API, the
//! normalized records handed to the GUI, and the connection details DTO.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use validator::Validate;

/// Raw database descriptor from `GET /v1/bdbs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDatabaseDescriptor {
    /// Opaque database identifier
    #[serde(deserialize_with = "string_or_number")]
    pub uid: String,

    /// Database name, shared by all replicas of an Active-Active database
    pub name: String,

    /// Active-Active (CRDT) database flag
    #[serde(default)]
    pub crdt: bool,

    /// Replica identifier of an Active-Active database
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub crdt_replica_id: Option<String>,

    /// Endpoints in the order reported by the cluster
    #[serde(default)]
    pub endpoints: Vec<DatabaseEndpoint>,

    /// Database password
    #[serde(default)]
    pub authentication_redis_pass: Option<String>,

    /// Opaque database status
    #[serde(default)]
    pub status: String,

    /// TLS mode
    #[serde(default)]
    pub tls_mode: TlsMode,

    /// Loaded modules
    #[serde(default)]
    pub module_list: Vec<DatabaseModule>,

    /// Persistence mode
    #[serde(default)]
    pub data_persistence: PersistenceMode,

    /// AOF fsync policy, meaningful only for AOF persistence
    #[serde(default)]
    pub aof_policy: Option<AofPolicy>,

    /// Snapshot policies, the active one listed last
    #[serde(default)]
    pub snapshot_policy: Vec<SnapshotPolicy>,

    /// Flash (bigstore) enabled
    #[serde(default)]
    pub bigstore: bool,

    /// In-memory replication enabled
    #[serde(default)]
    pub replication: bool,

    /// Periodic backup enabled
    #[serde(default)]
    pub backup: bool,

    /// Number of shards
    #[serde(default)]
    pub shards_count: u32,

    /// Inbound replication links
    #[serde(default)]
    pub replica_sources: Option<Vec<ReplicaSource>>,
}

/// Database endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseEndpoint {
    /// Endpoint kind
    pub addr_type: EndpointKind,

    /// Endpoint addresses
    #[serde(default)]
    pub addr: Vec<String>,

    /// Endpoint port
    pub port: u16,

    /// Endpoint DNS name
    #[serde(default)]
    pub dns_name: String,
}

/// Endpoint kind
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    #[default]
    Internal,
    External,
}

/// TLS mode of a database
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    #[default]
    Disabled,
    Enabled,
    /// TLS only on replication links; clients connect in plaintext
    ReplicaSsl,
}

/// Persistence mode of a database
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMode {
    #[default]
    Disabled,
    Aof,
    Snapshot,
}

/// AOF fsync policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AofPolicy {
    #[serde(rename = "appendfsync-always")]
    EveryWrite,
    #[serde(rename = "appendfsync-every-sec")]
    EveryOneSecond,
}

/// Snapshot policy entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotPolicy {
    /// Snapshot interval in seconds
    pub secs: u64,

    /// Write threshold triggering a snapshot within the interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writes: Option<u64>,
}

impl SnapshotPolicy {
    pub fn every(secs: u64) -> Self {
        Self { secs, writes: None }
    }
}

/// Loaded module
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseModule {
    pub module_name: String,
}

/// Inbound replication link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicaSource {
    pub uri: String,
}

/// Normalized database record returned to the GUI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDatabase {
    pub id: String,
    pub name: String,
    pub dns_name: String,
    pub address: String,
    pub port: u16,
    pub password: Option<String>,
    pub status: String,
    pub tls: bool,
    pub modules: Vec<String>,
    pub options: DatabaseOptions,
}

/// Capability flags of a normalized database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseOptions {
    pub persistence_enabled: bool,
    pub persistence_policy: PersistencePolicy,
    pub flash_enabled: bool,
    pub replication_enabled: bool,
    pub backup_enabled: bool,
    pub active_active_enabled: bool,
    pub clustering_enabled: bool,
    pub is_replica_target: bool,
    pub is_replica_source: bool,
}

/// Recognized persistence policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PersistencePolicy {
    #[serde(rename = "aof-every-1-second")]
    AofEveryOneSecond,
    #[serde(rename = "aof-every-write")]
    AofEveryWrite,
    #[serde(rename = "snapshot-every-1-hour")]
    SnapshotEveryOneHour,
    #[serde(rename = "snapshot-every-6-hours")]
    SnapshotEverySixHours,
    #[serde(rename = "snapshot-every-12-hours")]
    SnapshotEveryTwelveHours,
    #[serde(rename = "none")]
    None,
}

/// Cluster management API connection details posted by the GUI
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConnectionDetails {
    /// Cluster management host
    #[validate(length(min = 1, max = 255))]
    pub host: String,

    /// Cluster management port
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    /// Cluster admin username
    #[validate(length(min = 1))]
    pub username: String,

    /// Cluster admin password
    #[validate(length(min = 1))]
    pub password: String,
}

impl ClusterConnectionDetails {
    /// `host:port` form used in logs and error messages
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ClusterConnectionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConnectionDetails")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
