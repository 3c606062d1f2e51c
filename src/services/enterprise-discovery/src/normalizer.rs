//! Discovery Normalizer
//!
//! Turns the raw database descriptors of a cluster into the records the GUI
//! presents. Databases without an external endpoint are skipped; malformed
//! upstream data aborts the whole call so callers never act on a partial
//! discovery result.

use crate::error::{DiscoveryError, Result};
use crate::models::{
    AofPolicy, DatabaseEndpoint, DatabaseOptions, EndpointKind, NormalizedDatabase,
    PersistenceMode, PersistencePolicy, RawDatabaseDescriptor, TlsMode,
};
use crate::module_names::ModuleNameMapper;
use tracing::{debug, warn};

/// Normalize every database that exposes an external endpoint.
///
/// Output order follows input order. Replica-source inference scans the
/// whole `databases` slice, so callers must pass the complete cluster listing.
pub fn normalize(
    databases: &[RawDatabaseDescriptor],
    module_names: &dyn ModuleNameMapper,
) -> Result<Vec<NormalizedDatabase>> {
    let mut result = Vec::with_capacity(databases.len());

    for database in databases {
        let Some(endpoint) = external_endpoint(database) else {
            debug!(
                database_id = %database.uid,
                name = %database.name,
                "Skipping database without external endpoint"
            );
            continue;
        };

        let address = endpoint
            .addr
            .first()
            .cloned()
            .ok_or_else(|| DiscoveryError::malformed_endpoint(&database.uid))?;

        result.push(NormalizedDatabase {
            id: database.uid.clone(),
            name: display_name(database),
            dns_name: endpoint.dns_name.clone(),
            address,
            port: endpoint.port,
            password: database.authentication_redis_pass.clone(),
            status: database.status.clone(),
            tls: database.tls_mode == TlsMode::Enabled,
            modules: database
                .module_list
                .iter()
                .map(|module| module_names.canonical_name(&module.module_name))
                .collect(),
            options: DatabaseOptions {
                persistence_enabled: database.data_persistence != PersistenceMode::Disabled,
                persistence_policy: persistence_policy(database)?,
                flash_enabled: database.bigstore,
                replication_enabled: database.replication,
                backup_enabled: database.backup,
                active_active_enabled: database.crdt,
                clustering_enabled: database.shards_count > 1,
                is_replica_target: database
                    .replica_sources
                    .as_ref()
                    .is_some_and(|sources| !sources.is_empty()),
                is_replica_source: is_replica_source(databases, database),
            },
        });
    }

    Ok(result)
}

/// First endpoint of kind `external`, if any
pub fn external_endpoint(database: &RawDatabaseDescriptor) -> Option<&DatabaseEndpoint> {
    database
        .endpoints
        .iter()
        .find(|endpoint| endpoint.addr_type == EndpointKind::External)
}

/// Active-Active replicas share a name, so the replica id is appended
pub fn display_name(database: &RawDatabaseDescriptor) -> String {
    if !database.crdt {
        return database.name.clone();
    }

    match &database.crdt_replica_id {
        Some(replica_id) => format!("{}-{}", database.name, replica_id),
        None => {
            warn!(
                database_id = %database.uid,
                "Active-Active database reported without replica id"
            );
            database.name.clone()
        }
    }
}

/// Classify the persistence settings of a database.
///
/// For snapshot persistence the last listed policy is the active one.
/// Intervals without a named policy map to [`PersistencePolicy::None`].
pub fn persistence_policy(database: &RawDatabaseDescriptor) -> Result<PersistencePolicy> {
    match database.data_persistence {
        PersistenceMode::Aof => Ok(match database.aof_policy {
            Some(AofPolicy::EveryOneSecond) => PersistencePolicy::AofEveryOneSecond,
            _ => PersistencePolicy::AofEveryWrite,
        }),
        PersistenceMode::Snapshot => {
            let policy = database
                .snapshot_policy
                .last()
                .ok_or_else(|| DiscoveryError::missing_snapshot_policy(&database.uid))?;

            Ok(match policy.secs {
                3600 => PersistencePolicy::SnapshotEveryOneHour,
                21600 => PersistencePolicy::SnapshotEverySixHours,
                43200 => PersistencePolicy::SnapshotEveryTwelveHours,
                _ => PersistencePolicy::None,
            })
        }
        PersistenceMode::Disabled => Ok(PersistencePolicy::None),
    }
}

/// Databases in `databases` that replicate from `source`.
///
/// A replica lists `source`'s external `dns_name:port` inside one of its
/// replica source URIs. Matching is by substring. A source without a DNS name
/// has no replicas, since `:port` alone would match unrelated URIs.
pub fn find_replicas<'a>(
    databases: &'a [RawDatabaseDescriptor],
    source: &RawDatabaseDescriptor,
) -> Vec<&'a RawDatabaseDescriptor> {
    let Some(endpoint) = external_endpoint(source) else {
        return Vec::new();
    };
    if endpoint.dns_name.is_empty() {
        return Vec::new();
    }
    let needle = format!("{}:{}", endpoint.dns_name, endpoint.port);

    databases
        .iter()
        .filter(|replica| replica.uid != source.uid)
        .filter(|replica| {
            replica
                .replica_sources
                .as_deref()
                .unwrap_or_default()
                .iter()
                .any(|link| link.uri.contains(&needle))
        })
        .collect()
}

/// Whether any other database replicates from `source`
pub fn is_replica_source(databases: &[RawDatabaseDescriptor], source: &RawDatabaseDescriptor) -> bool {
    !find_replicas(databases, source).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DatabaseModule, ReplicaSource, SnapshotPolicy};
    use crate::module_names::RedisModuleNames;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn endpoint(kind: EndpointKind, dns_name: &str, port: u16) -> DatabaseEndpoint {
        DatabaseEndpoint {
            addr_type: kind,
            addr: vec!["10.0.0.1".to_string()],
            port,
            dns_name: dns_name.to_string(),
        }
    }

    fn database(uid: &str, dns_name: &str, port: u16) -> RawDatabaseDescriptor {
        RawDatabaseDescriptor {
            uid: uid.to_string(),
            name: format!("db{}", uid),
            status: "active".to_string(),
            endpoints: vec![
                endpoint(EndpointKind::Internal, "internal.cluster.local", port),
                endpoint(EndpointKind::External, dns_name, port),
            ],
            shards_count: 1,
            ..Default::default()
        }
    }

    fn internal_only(uid: &str) -> RawDatabaseDescriptor {
        RawDatabaseDescriptor {
            endpoints: vec![endpoint(EndpointKind::Internal, "internal.cluster.local", 1)],
            ..database(uid, "unused", 1)
        }
    }

    fn replica_of(uid: &str, uri: &str) -> RawDatabaseDescriptor {
        RawDatabaseDescriptor {
            replica_sources: Some(vec![ReplicaSource {
                uri: uri.to_string(),
            }]),
            ..database(uid, &format!("{}.example.com", uid), 2000)
        }
    }

    fn run(databases: &[RawDatabaseDescriptor]) -> Result<Vec<NormalizedDatabase>> {
        normalize(databases, &RedisModuleNames)
    }

    #[test]
    fn test_internal_only_database_is_skipped() {
        let result = run(&[internal_only("1")]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_filtering_preserves_order() {
        let databases = vec![
            database("1", "a.example.com", 1000),
            internal_only("2"),
            database("3", "c.example.com", 1002),
            internal_only("4"),
            database("5", "e.example.com", 1004),
        ];

        let ids: Vec<String> = run(&databases)
            .unwrap()
            .into_iter()
            .map(|db| db.id)
            .collect();

        assert_eq!(ids, vec!["1", "3", "5"]);
    }

    #[test]
    fn test_first_external_endpoint_wins() {
        let mut db = database("1", "first.example.com", 1000);
        db.endpoints.push(endpoint(EndpointKind::External, "second.example.com", 1001));

        let result = run(&[db]).unwrap();
        assert_eq!(result[0].dns_name, "first.example.com");
        assert_eq!(result[0].port, 1000);
        assert_eq!(result[0].address, "10.0.0.1");
    }

    #[test]
    fn test_empty_address_list_is_malformed() {
        let mut db = database("7", "a.example.com", 1000);
        db.endpoints[1].addr.clear();

        let error = run(&[db]).unwrap_err();
        assert!(matches!(
            error,
            DiscoveryError::MalformedEndpoint { ref database_id } if database_id == "7"
        ));
    }

    #[test]
    fn test_malformed_record_aborts_whole_call() {
        let mut broken = database("2", "b.example.com", 1001);
        broken.endpoints[1].addr.clear();

        let databases = vec![database("1", "a.example.com", 1000), broken];
        assert!(run(&databases).is_err());
    }

    #[test]
    fn test_internal_endpoint_without_addresses_is_ignored() {
        let mut db = database("1", "a.example.com", 1000);
        db.endpoints[0].addr.clear();

        assert_eq!(run(&[db]).unwrap()[0].address, "10.0.0.1");
    }

    #[test]
    fn test_active_active_name_carries_replica_id() {
        let mut db = database("1", "a.example.com", 1000);
        db.name = "db1".to_string();
        db.crdt = true;
        db.crdt_replica_id = Some("r2".to_string());

        let result = run(&[db]).unwrap();
        assert_eq!(result[0].name, "db1-r2");
        assert!(result[0].options.active_active_enabled);
    }

    #[test]
    fn test_plain_database_keeps_name() {
        let mut db = database("1", "a.example.com", 1000);
        db.name = "db1".to_string();
        db.crdt_replica_id = Some("r2".to_string());

        assert_eq!(run(&[db]).unwrap()[0].name, "db1");
    }

    #[test]
    fn test_active_active_without_replica_id_keeps_name() {
        let mut db = database("1", "a.example.com", 1000);
        db.name = "db1".to_string();
        db.crdt = true;

        assert_eq!(display_name(&db), "db1");
    }

    #[rstest]
    #[case(Some(AofPolicy::EveryOneSecond), PersistencePolicy::AofEveryOneSecond)]
    #[case(Some(AofPolicy::EveryWrite), PersistencePolicy::AofEveryWrite)]
    #[case(None, PersistencePolicy::AofEveryWrite)]
    fn test_aof_policy(#[case] aof: Option<AofPolicy>, #[case] expected: PersistencePolicy) {
        let db = RawDatabaseDescriptor {
            data_persistence: PersistenceMode::Aof,
            aof_policy: aof,
            ..database("1", "a.example.com", 1000)
        };

        assert_eq!(persistence_policy(&db).unwrap(), expected);
    }

    #[rstest]
    #[case(3600, PersistencePolicy::SnapshotEveryOneHour)]
    #[case(21600, PersistencePolicy::SnapshotEverySixHours)]
    #[case(43200, PersistencePolicy::SnapshotEveryTwelveHours)]
    #[case(900, PersistencePolicy::None)]
    fn test_snapshot_interval(#[case] secs: u64, #[case] expected: PersistencePolicy) {
        let db = RawDatabaseDescriptor {
            data_persistence: PersistenceMode::Snapshot,
            snapshot_policy: vec![SnapshotPolicy::every(secs)],
            ..database("1", "a.example.com", 1000)
        };

        assert_eq!(persistence_policy(&db).unwrap(), expected);
    }

    #[test]
    fn test_last_snapshot_policy_wins() {
        let db = RawDatabaseDescriptor {
            data_persistence: PersistenceMode::Snapshot,
            snapshot_policy: vec![SnapshotPolicy::every(3600), SnapshotPolicy::every(21600)],
            ..database("1", "a.example.com", 1000)
        };

        let result = run(std::slice::from_ref(&db)).unwrap();
        assert_eq!(
            result[0].options.persistence_policy,
            PersistencePolicy::SnapshotEverySixHours
        );
        assert!(result[0].options.persistence_enabled);
        // the input is left untouched
        assert_eq!(db.snapshot_policy.len(), 2);
    }

    #[test]
    fn test_snapshot_without_policy_fails() {
        let db = RawDatabaseDescriptor {
            data_persistence: PersistenceMode::Snapshot,
            ..database("9", "a.example.com", 1000)
        };

        let error = run(&[db]).unwrap_err();
        assert!(matches!(error, DiscoveryError::MissingSnapshotPolicy { .. }));
    }

    #[test]
    fn test_disabled_persistence() {
        let db = RawDatabaseDescriptor {
            aof_policy: Some(AofPolicy::EveryOneSecond),
            ..database("1", "a.example.com", 1000)
        };

        let options = &run(&[db]).unwrap()[0].options;
        assert!(!options.persistence_enabled);
        assert_eq!(options.persistence_policy, PersistencePolicy::None);
    }

    #[test]
    fn test_replica_detection() {
        let source = database("a", "a.example.com", 1000);
        let target = replica_of("b", "redis://a.example.com:1000/0");

        let result = run(&[source, target]).unwrap();

        assert!(result[0].options.is_replica_source);
        assert!(!result[0].options.is_replica_target);
        assert!(result[1].options.is_replica_target);
        assert!(!result[1].options.is_replica_source);
    }

    #[test]
    fn test_replica_source_needs_matching_port() {
        let source = database("a", "a.example.com", 1000);
        let target = replica_of("b", "redis://a.example.com:1001/0");

        assert!(!run(&[source, target]).unwrap()[0].options.is_replica_source);
    }

    #[test]
    fn test_self_reference_is_not_replication() {
        let db = replica_of("a", "redis://a.example.com:2000/0");

        let options = &run(&[db]).unwrap()[0].options;
        assert!(options.is_replica_target);
        assert!(!options.is_replica_source);
    }

    #[test]
    fn test_replica_without_external_endpoint_still_counts() {
        let source = database("a", "a.example.com", 1000);
        let target = RawDatabaseDescriptor {
            replica_sources: Some(vec![ReplicaSource {
                uri: "redis://a.example.com:1000".to_string(),
            }]),
            ..internal_only("b")
        };

        let databases = vec![source, target];
        let result = run(&databases).unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].options.is_replica_source);
        assert_eq!(find_replicas(&databases, &databases[0])[0].uid, "b");
    }

    #[test]
    fn test_source_without_external_endpoint_has_no_replicas() {
        let source = internal_only("a");
        let target = replica_of("b", "redis://internal.cluster.local:1");

        assert!(find_replicas(&[source.clone(), target], &source).is_empty());
    }

    #[test]
    fn test_source_without_dns_name_has_no_replicas() {
        let source = database("a", "", 12000);
        let unrelated = replica_of("b", "redis://unrelated.example.com:12000");

        let databases = vec![source, unrelated];
        assert!(find_replicas(&databases, &databases[0]).is_empty());

        let result = run(&databases).unwrap();
        assert!(!result[0].options.is_replica_source);
        assert!(result[1].options.is_replica_target);
    }

    #[test]
    fn test_missing_dns_name_deserializes_without_replica_match() {
        let raw: Vec<RawDatabaseDescriptor> = serde_json::from_value(serde_json::json!([
            {
                "uid": 1,
                "name": "a",
                "endpoints": [{"addr_type": "external", "addr": ["10.0.0.1"], "port": 12000}]
            },
            {
                "uid": 2,
                "name": "b",
                "endpoints": [{"addr_type": "external", "addr": ["10.0.0.2"], "port": 12001, "dns_name": "b.example.com"}],
                "replica_sources": [{"uri": "redis://unrelated.example.com:12000"}]
            }
        ]))
        .unwrap();

        let result = run(&raw).unwrap();
        assert_eq!(result[0].dns_name, "");
        assert!(!result[0].options.is_replica_source);
    }

    #[test]
    fn test_skip_happens_before_persistence_classification() {
        let db = RawDatabaseDescriptor {
            data_persistence: PersistenceMode::Snapshot,
            snapshot_policy: Vec::new(),
            ..internal_only("1")
        };

        let result = run(&[db, database("2", "b.example.com", 1001)]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_empty_replica_sources_is_not_target() {
        let db = RawDatabaseDescriptor {
            replica_sources: Some(Vec::new()),
            ..database("1", "a.example.com", 1000)
        };

        assert!(!run(&[db]).unwrap()[0].options.is_replica_target);
    }

    #[test]
    fn test_flags_and_modules() {
        let db = RawDatabaseDescriptor {
            tls_mode: TlsMode::Enabled,
            bigstore: true,
            replication: true,
            backup: true,
            shards_count: 3,
            authentication_redis_pass: Some("pass".to_string()),
            module_list: vec![
                DatabaseModule {
                    module_name: "ReJSON".to_string(),
                },
                DatabaseModule {
                    module_name: "custom".to_string(),
                },
            ],
            ..database("1", "a.example.com", 1000)
        };

        let result = run(&[db]).unwrap().remove(0);

        assert!(result.tls);
        assert_eq!(result.password.as_deref(), Some("pass"));
        assert_eq!(result.modules, vec!["RedisJSON", "custom"]);
        assert!(result.options.flash_enabled);
        assert!(result.options.replication_enabled);
        assert!(result.options.backup_enabled);
        assert!(result.options.clustering_enabled);
    }

    #[rstest]
    #[case(TlsMode::Disabled)]
    #[case(TlsMode::ReplicaSsl)]
    fn test_tls_only_when_enabled(#[case] mode: TlsMode) {
        let db = RawDatabaseDescriptor {
            tls_mode: mode,
            ..database("1", "a.example.com", 1000)
        };

        assert!(!run(&[db]).unwrap()[0].tls);
    }

    #[test]
    fn test_single_shard_is_not_clustered() {
        let result = run(&[database("1", "a.example.com", 1000)]).unwrap();
        assert!(!result[0].options.clustering_enabled);
    }

    #[test]
    fn test_normalize_is_repeatable() {
        let databases = vec![
            RawDatabaseDescriptor {
                data_persistence: PersistenceMode::Snapshot,
                snapshot_policy: vec![SnapshotPolicy::every(43200)],
                ..database("a", "a.example.com", 1000)
            },
            replica_of("b", "redis://a.example.com:1000/0"),
        ];

        let first = serde_json::to_vec(&run(&databases).unwrap()).unwrap();
        let second = serde_json::to_vec(&run(&databases).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
