//! In-memory store.
//!
//! Tables live in a `Vec` per entity kind behind a `RwLock`. Nothing is
//! persisted; all rows are lost when the process exits. Writes are staged
//! on a copy of the tables and swapped in only when every row validates,
//! which makes each insert and each seed all-or-nothing.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::{BookRecord, EntityKind, SeedRecord, SeedSet, StoreError, StoreHandle, UserRecord};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Vec<UserRecord>,
    books: Vec<BookRecord>,
}

impl Tables {
    fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::User => self.users.len(),
            EntityKind::Book => self.books.len(),
        }
    }

    fn insert(&mut self, kind: EntityKind, records: &[SeedRecord]) -> Result<(), StoreError> {
        for record in records {
            match record {
                SeedRecord::User(user) if kind == EntityKind::User => {
                    if self.users.iter().any(|u| u.username == user.username) {
                        return Err(StoreError::Constraint {
                            table: kind.table().to_owned(),
                            reason: format!("duplicate username '{}'", user.username),
                        });
                    }
                    self.users.push(user.clone());
                }
                SeedRecord::Book(book) if kind == EntityKind::Book => {
                    if !self.users.iter().any(|u| u.username == book.owner) {
                        return Err(StoreError::MissingOwner {
                            title: book.title.clone(),
                            owner: book.owner.clone(),
                        });
                    }
                    if self.books.iter().any(|b| b.title == book.title) {
                        return Err(StoreError::Constraint {
                            table: kind.table().to_owned(),
                            reason: format!("duplicate title '{}'", book.title),
                        });
                    }
                    self.books.push(book.clone());
                }
                other => {
                    return Err(StoreError::KindMismatch {
                        expected: kind,
                        actual: other.kind(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// An in-memory store.
///
/// `None` tables mean the schema has not been created. Clones share the
/// same tables.
///
/// # Examples
///
/// ```
/// # use vampi_storage::{EntityKind, MemoryStore, StoreHandle};
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new();
/// store.create_schema_if_absent().await.unwrap();
/// assert!(!store.has_any_record(EntityKind::User).await.unwrap());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Option<Tables>>>,
}

impl MemoryStore {
    /// Create a store with no schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the schema currently exists.
    pub async fn has_schema(&self) -> bool {
        self.tables.read().await.is_some()
    }

    /// Copy of every row of one kind, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingSchema`] if the schema has not been created.
    pub async fn records(&self, kind: EntityKind) -> Result<Vec<SeedRecord>, StoreError> {
        let guard = self.tables.read().await;
        let tables = guard.as_ref().ok_or_else(|| missing(kind))?;
        let rows = match kind {
            EntityKind::User => tables.users.iter().cloned().map(SeedRecord::User).collect(),
            EntityKind::Book => tables.books.iter().cloned().map(SeedRecord::Book).collect(),
        };
        Ok(rows)
    }
}

fn missing(kind: EntityKind) -> StoreError {
    StoreError::MissingSchema {
        table: kind.table().to_owned(),
    }
}

#[async_trait::async_trait]
impl StoreHandle for MemoryStore {
    async fn create_schema_if_absent(&self) -> Result<(), StoreError> {
        let mut guard = self.tables.write().await;
        if guard.is_none() {
            *guard = Some(Tables::default());
        }
        Ok(())
    }

    async fn has_any_record(&self, kind: EntityKind) -> Result<bool, StoreError> {
        let guard = self.tables.read().await;
        let tables = guard.as_ref().ok_or_else(|| missing(kind))?;
        Ok(tables.count(kind) > 0)
    }

    async fn insert_records(
        &self,
        kind: EntityKind,
        records: &[SeedRecord],
    ) -> Result<(), StoreError> {
        let mut guard = self.tables.write().await;
        let tables = guard.as_mut().ok_or_else(|| missing(kind))?;
        let mut staged = tables.clone();
        staged.insert(kind, records)?;
        *tables = staged;
        Ok(())
    }

    async fn drop_all_schema(&self) -> Result<(), StoreError> {
        if let Some(dropped) = self.tables.write().await.take() {
            debug!(
                users = dropped.users.len(),
                books = dropped.books.len(),
                "dropped in-memory tables"
            );
        }
        Ok(())
    }

    async fn count_records(&self, kind: EntityKind) -> Result<u64, StoreError> {
        let guard = self.tables.read().await;
        let tables = guard.as_ref().ok_or_else(|| missing(kind))?;
        Ok(tables.count(kind) as u64)
    }

    async fn seed(&self, set: &SeedSet) -> Result<(), StoreError> {
        let mut guard = self.tables.write().await;
        let tables = guard.as_mut().ok_or_else(|| missing(EntityKind::User))?;
        let mut staged = tables.clone();
        staged.insert(EntityKind::User, &set.records(EntityKind::User))?;
        staged.insert(EntityKind::Book, &set.records(EntityKind::Book))?;
        *tables = staged;
        debug!(users = set.users.len(), books = set.books.len(), "seeded in-memory tables");
        Ok(())
    }
}
