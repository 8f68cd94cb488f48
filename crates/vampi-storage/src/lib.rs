//! Store capability for `VAmPI`.
//!
//! This crate defines the [`StoreHandle`] trait — the narrow interface the
//! bootstrap sequence needs from a database: materialize the schema, ask
//! whether a table has any rows, insert rows, and drop everything. It knows
//! nothing about configuration, HTTP, or what the rows mean to the API.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`] — in-process tables, the default backend and the one
//!   used by tests
//! - [`PostgresStore`] — PostgreSQL via sqlx (feature `postgres-backend`)

mod error;
mod memory;
#[cfg(feature = "postgres-backend")]
mod postgres_backend;
mod record;

pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(feature = "postgres-backend")]
pub use postgres_backend::PostgresStore;
pub use record::{BookRecord, EntityKind, SeedRecord, SeedSet, UserRecord};

/// A pluggable entity store.
///
/// Every operation is atomic on its own; callers that need several
/// operations to be observed together must coordinate externally.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait StoreHandle: Send + Sync + 'static {
    /// Create every table if it does not exist yet.
    ///
    /// Creating an already-present schema is a no-op, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be reached.
    async fn create_schema_if_absent(&self) -> Result<(), StoreError>;

    /// Whether the table for `kind` holds at least one row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingSchema`] if the schema has not been
    /// created, or [`StoreError::Unavailable`] if the store cannot be reached.
    async fn has_any_record(&self, kind: EntityKind) -> Result<bool, StoreError>;

    /// Insert `records` into the table for `kind`, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::KindMismatch`] if any record is not of `kind`,
    /// [`StoreError::MissingOwner`] if a book references an unknown user,
    /// and [`StoreError::Constraint`] on a duplicate username or title.
    async fn insert_records(
        &self,
        kind: EntityKind,
        records: &[SeedRecord],
    ) -> Result<(), StoreError>;

    /// Drop every table and all rows. Dropping an absent schema is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be reached.
    async fn drop_all_schema(&self) -> Result<(), StoreError>;

    /// Number of rows in the table for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingSchema`] if the schema has not been
    /// created, or [`StoreError::Unavailable`] if the store cannot be reached.
    async fn count_records(&self, kind: EntityKind) -> Result<u64, StoreError>;

    /// Write a whole [`SeedSet`], users first.
    ///
    /// The default implementation issues one [`insert_records`] call per
    /// kind, so a failure between the two leaves users without books.
    /// Backends that can should override this with a single atomic write.
    ///
    /// [`insert_records`]: StoreHandle::insert_records
    ///
    /// # Errors
    ///
    /// Propagates any error from [`insert_records`].
    async fn seed(&self, set: &SeedSet) -> Result<(), StoreError> {
        self.insert_records(EntityKind::User, &set.records(EntityKind::User))
            .await?;
        self.insert_records(EntityKind::Book, &set.records(EntityKind::Book))
            .await
    }
}
