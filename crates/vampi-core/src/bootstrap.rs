//! Bootstrap sequence: schema materialization and baseline seeding.
//!
//! [`BootstrapSequencer::ensure_ready`] runs once at process start, before
//! the listener binds. It is safe on every restart: seeding is skipped when
//! the user table already holds rows, so baseline rows are never duplicated
//! and rows written by requests survive.
//!
//! [`BootstrapSequencer::force_reset`] is the administrative path. It drops
//! everything and reseeds unconditionally; it takes no locks and must not
//! be relied on while other requests are touching the store.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use vampi_storage::{EntityKind, SeedSet, StoreHandle};

use crate::config::RuntimeConfig;
use crate::error::{BootstrapError, BootstrapStep};
use crate::info::{InfoSnapshot, SERVICE_NAME, SERVICE_PURPOSE};
use crate::seed;

/// What [`BootstrapSequencer::ensure_ready`] did to reach the ready state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The store was empty and the baseline set was written.
    Seeded { records: usize },
    /// The store already held rows; nothing was written.
    AlreadyInitialized,
}

/// Drives a store to the ready state.
pub struct BootstrapSequencer {
    store: Arc<dyn StoreHandle>,
    baseline: SeedSet,
}

impl std::fmt::Debug for BootstrapSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapSequencer")
            .field("baseline_records", &self.baseline.len())
            .finish_non_exhaustive()
    }
}

impl BootstrapSequencer {
    /// Create a sequencer that seeds the built-in baseline set.
    pub fn new(store: Arc<dyn StoreHandle>) -> Self {
        Self {
            store,
            baseline: seed::baseline(),
        }
    }

    /// The rows written by every seeding path.
    pub fn baseline(&self) -> &SeedSet {
        &self.baseline
    }

    /// Bring the store to the ready state without duplicating seed rows.
    ///
    /// Creates the schema if absent, then writes the baseline set only if
    /// no user exists yet. The write is a single atomic store operation, so
    /// an interrupted seed leaves the user table empty and the next start
    /// seeds again.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::StoreUnavailable`] if any store step fails.
    /// The caller must not start serving in that case.
    pub async fn ensure_ready(
        &self,
        config: &RuntimeConfig,
    ) -> Result<BootstrapOutcome, BootstrapError> {
        info!(
            vulnerable = config.vulnerable_mode,
            token_ttl_secs = config.token_ttl_secs,
            environment = %config.environment_label,
            "initializing database"
        );

        self.store
            .create_schema_if_absent()
            .await
            .map_err(BootstrapError::at(BootstrapStep::CreateSchema))?;
        info!("database tables created");

        let populated = self
            .store
            .has_any_record(EntityKind::User)
            .await
            .map_err(BootstrapError::at(BootstrapStep::Query))?;

        if populated {
            info!("database already contains data, skipping initialization");
            return Ok(BootstrapOutcome::AlreadyInitialized);
        }

        self.store
            .seed(&self.baseline)
            .await
            .map_err(BootstrapError::at(BootstrapStep::Seed))?;

        let records = self.baseline.len();
        info!(records, "database populated with initial data");
        Ok(BootstrapOutcome::Seeded { records })
    }

    /// Drop all data, recreate the schema, and write the baseline set.
    ///
    /// Returns the number of rows written. Any previously accumulated rows
    /// are lost.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::StoreUnavailable`] if any store step fails.
    pub async fn force_reset(&self) -> Result<usize, BootstrapError> {
        self.store
            .drop_all_schema()
            .await
            .map_err(BootstrapError::at(BootstrapStep::DropSchema))?;
        self.store
            .create_schema_if_absent()
            .await
            .map_err(BootstrapError::at(BootstrapStep::CreateSchema))?;
        self.store
            .seed(&self.baseline)
            .await
            .map_err(BootstrapError::at(BootstrapStep::Seed))?;

        let records = self.baseline.len();
        info!(records, "database reset to baseline");
        Ok(records)
    }

    /// Describe the running service. Touches no store.
    #[must_use]
    pub fn info_snapshot(config: &RuntimeConfig) -> InfoSnapshot {
        InfoSnapshot {
            service: SERVICE_NAME,
            purpose: SERVICE_PURPOSE,
            vulnerable: config.vulnerable_mode,
            environment: config.environment_label.clone(),
            deployment: config.deployment_label.clone(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vampi_storage::{MemoryStore, SeedRecord, SeedSet, StoreError, UserRecord};

    fn sequencer(store: &MemoryStore) -> BootstrapSequencer {
        BootstrapSequencer::new(Arc::new(store.clone()))
    }

    fn extra_user(n: usize) -> SeedRecord {
        SeedRecord::User(UserRecord {
            username: format!("visitor{n}"),
            email: format!("visitor{n}@mail.com"),
            password: "hunter2".to_owned(),
            admin: false,
        })
    }

    async fn counts(store: &MemoryStore) -> (u64, u64) {
        (
            store.count_records(EntityKind::User).await.unwrap(),
            store.count_records(EntityKind::Book).await.unwrap(),
        )
    }

    fn baseline_counts() -> (u64, u64) {
        let set = seed::baseline();
        (
            set.count(EntityKind::User) as u64,
            set.count(EntityKind::Book) as u64,
        )
    }

    #[tokio::test]
    async fn ensure_ready_seeds_empty_store() {
        let store = MemoryStore::new();
        let outcome = sequencer(&store)
            .ensure_ready(&RuntimeConfig::default())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BootstrapOutcome::Seeded {
                records: seed::baseline().len()
            }
        );
        assert_eq!(counts(&store).await, baseline_counts());
    }

    #[tokio::test]
    async fn ensure_ready_twice_does_not_duplicate() {
        let store = MemoryStore::new();
        let seq = sequencer(&store);
        let config = RuntimeConfig::default();

        seq.ensure_ready(&config).await.unwrap();
        let second = seq.ensure_ready(&config).await.unwrap();

        assert_eq!(second, BootstrapOutcome::AlreadyInitialized);
        assert_eq!(counts(&store).await, baseline_counts());
    }

    #[tokio::test]
    async fn ensure_ready_keeps_accumulated_rows() {
        let store = MemoryStore::new();
        let seq = sequencer(&store);
        let config = RuntimeConfig::default();
        seq.ensure_ready(&config).await.unwrap();

        let extras: Vec<SeedRecord> = (0..4).map(extra_user).collect();
        store.insert_records(EntityKind::User, &extras).await.unwrap();
        let before = store.records(EntityKind::User).await.unwrap();

        // Simulated restart.
        let outcome = sequencer(&store).ensure_ready(&config).await.unwrap();

        assert_eq!(outcome, BootstrapOutcome::AlreadyInitialized);
        assert_eq!(store.records(EntityKind::User).await.unwrap(), before);
        assert_eq!(before.len(), seed::baseline().users.len() + 4);
    }

    #[tokio::test]
    async fn force_reset_discards_extra_rows() {
        let store = MemoryStore::new();
        let seq = sequencer(&store);
        seq.ensure_ready(&RuntimeConfig::default()).await.unwrap();
        let baseline_users = store.records(EntityKind::User).await.unwrap();

        store
            .insert_records(EntityKind::User, &[extra_user(1), extra_user(2)])
            .await
            .unwrap();

        let written = seq.force_reset().await.unwrap();

        assert_eq!(written, seed::baseline().len());
        assert_eq!(store.records(EntityKind::User).await.unwrap(), baseline_users);
        assert_eq!(counts(&store).await, baseline_counts());
    }

    #[tokio::test]
    async fn force_reset_twice_yields_identical_content() {
        let store = MemoryStore::new();
        let seq = sequencer(&store);

        seq.force_reset().await.unwrap();
        let users = store.records(EntityKind::User).await.unwrap();
        let books = store.records(EntityKind::Book).await.unwrap();

        seq.force_reset().await.unwrap();
        assert_eq!(store.records(EntityKind::User).await.unwrap(), users);
        assert_eq!(store.records(EntityKind::Book).await.unwrap(), books);
    }

    #[tokio::test]
    async fn force_reset_works_on_uninitialized_store() {
        let store = MemoryStore::new();
        sequencer(&store).force_reset().await.unwrap();
        assert_eq!(counts(&store).await, baseline_counts());
    }

    #[test]
    fn info_snapshot_reports_vulnerable_flag_verbatim() {
        let on = RuntimeConfig {
            vulnerable_mode: true,
            ..RuntimeConfig::default()
        };
        let off = RuntimeConfig::default();

        let json = serde_json::to_value(BootstrapSequencer::info_snapshot(&on)).unwrap();
        assert_eq!(json["vulnerable"], serde_json::Value::Bool(true));

        let json = serde_json::to_value(BootstrapSequencer::info_snapshot(&off)).unwrap();
        assert_eq!(json["vulnerable"], serde_json::Value::Bool(false));
    }

    #[test]
    fn info_snapshot_carries_labels() {
        let config = RuntimeConfig {
            environment_label: "production".to_owned(),
            deployment_label: "main".to_owned(),
            ..RuntimeConfig::default()
        };
        let snapshot = BootstrapSequencer::info_snapshot(&config);
        assert_eq!(snapshot.service, SERVICE_NAME);
        assert_eq!(snapshot.environment, "production");
        assert_eq!(snapshot.deployment, "main");
    }

    // ── Failure propagation ──────────────────────────────────────────

    /// Delegates to a memory store but fails at one chosen step.
    struct FailingStore {
        fail_on: BootstrapStep,
        inner: MemoryStore,
    }

    impl FailingStore {
        fn check(&self, step: BootstrapStep) -> Result<(), StoreError> {
            if self.fail_on == step {
                Err(StoreError::Unavailable {
                    operation: step.to_string(),
                    reason: "connection refused".to_owned(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl StoreHandle for FailingStore {
        async fn create_schema_if_absent(&self) -> Result<(), StoreError> {
            self.check(BootstrapStep::CreateSchema)?;
            self.inner.create_schema_if_absent().await
        }

        async fn has_any_record(&self, kind: EntityKind) -> Result<bool, StoreError> {
            self.check(BootstrapStep::Query)?;
            self.inner.has_any_record(kind).await
        }

        async fn insert_records(
            &self,
            kind: EntityKind,
            records: &[SeedRecord],
        ) -> Result<(), StoreError> {
            self.check(BootstrapStep::Seed)?;
            self.inner.insert_records(kind, records).await
        }

        async fn drop_all_schema(&self) -> Result<(), StoreError> {
            self.check(BootstrapStep::DropSchema)?;
            self.inner.drop_all_schema().await
        }

        async fn count_records(&self, kind: EntityKind) -> Result<u64, StoreError> {
            self.inner.count_records(kind).await
        }

        async fn seed(&self, set: &SeedSet) -> Result<(), StoreError> {
            self.check(BootstrapStep::Seed)?;
            self.inner.seed(set).await
        }
    }

    async fn ensure_ready_failing_at(step: BootstrapStep) -> BootstrapError {
        let store = FailingStore {
            fail_on: step,
            inner: MemoryStore::new(),
        };
        BootstrapSequencer::new(Arc::new(store))
            .ensure_ready(&RuntimeConfig::default())
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn schema_failure_propagates() {
        let err = ensure_ready_failing_at(BootstrapStep::CreateSchema).await;
        assert!(matches!(
            err,
            BootstrapError::StoreUnavailable {
                step: BootstrapStep::CreateSchema,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn query_failure_propagates() {
        let err = ensure_ready_failing_at(BootstrapStep::Query).await;
        assert!(matches!(
            err,
            BootstrapError::StoreUnavailable {
                step: BootstrapStep::Query,
                ..
            }
        ));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn seed_failure_propagates_and_leaves_store_empty() {
        let inner = MemoryStore::new();
        let store = FailingStore {
            fail_on: BootstrapStep::Seed,
            inner: inner.clone(),
        };
        let err = BootstrapSequencer::new(Arc::new(store))
            .ensure_ready(&RuntimeConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::StoreUnavailable {
                step: BootstrapStep::Seed,
                ..
            }
        ));
        assert!(!inner.has_any_record(EntityKind::User).await.unwrap());
    }

    #[tokio::test]
    async fn force_reset_drop_failure_propagates() {
        let store = FailingStore {
            fail_on: BootstrapStep::DropSchema,
            inner: MemoryStore::new(),
        };
        let err = BootstrapSequencer::new(Arc::new(store))
            .force_reset()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::StoreUnavailable {
                step: BootstrapStep::DropSchema,
                ..
            }
        ));
    }
}
