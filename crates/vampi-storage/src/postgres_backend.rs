//! PostgreSQL store.
//!
//! Stores users and books in two tables, `users` and `books`, with books
//! referencing their owner by id. The schema is created with
//! `CREATE TABLE IF NOT EXISTS` so materializing it is idempotent.
//!
//! Feature-gated behind `postgres-backend`. Uses `sqlx` with the Tokio
//! runtime for fully async operations.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::{BookRecord, EntityKind, SeedRecord, SeedSet, StoreError, StoreHandle, UserRecord};

/// PostgreSQL SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";
/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// A store backed by PostgreSQL.
///
/// Thread-safe via `PgPool` (connection pool).
///
/// # Examples
///
/// ```no_run
/// # use vampi_storage::PostgresStore;
/// # #[tokio::main]
/// # async fn main() {
/// let store = PostgresStore::connect("postgres://localhost/vampi").await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStore")
            .field("pool", &"[PgPool]")
            .finish_non_exhaustive()
    }
}

impl PostgresStore {
    /// Connect to PostgreSQL. The schema is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| unavailable("connect", &e))?;

        Ok(Self { pool })
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        self.pool.begin().await.map_err(|e| StoreError::Transaction {
            reason: e.to_string(),
        })
    }
}

fn unavailable(operation: &str, err: &sqlx::Error) -> StoreError {
    StoreError::Unavailable {
        operation: operation.to_owned(),
        reason: err.to_string(),
    }
}

/// Translate a sqlx error raised against `kind`'s table.
fn table_error(kind: EntityKind, operation: &str, err: &sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = err {
        match db_err.code().as_deref() {
            Some(UNDEFINED_TABLE) => {
                return StoreError::MissingSchema {
                    table: kind.table().to_owned(),
                };
            }
            Some(UNIQUE_VIOLATION) => {
                return StoreError::Constraint {
                    table: kind.table().to_owned(),
                    reason: db_err.message().to_owned(),
                };
            }
            _ => {}
        }
    }
    unavailable(operation, err)
}

async fn insert_user(
    tx: &mut Transaction<'static, Postgres>,
    user: &UserRecord,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO users (username, email, password, admin) VALUES ($1, $2, $3, $4)")
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.admin)
        .execute(&mut **tx)
        .await
        .map_err(|e| table_error(EntityKind::User, "insert", &e))?;
    Ok(())
}

async fn insert_book(
    tx: &mut Transaction<'static, Postgres>,
    book: &BookRecord,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        r"INSERT INTO books (book_title, secret_content, user_id)
          SELECT $1, $2, id FROM users WHERE username = $3",
    )
    .bind(&book.title)
    .bind(&book.secret)
    .bind(&book.owner)
    .execute(&mut **tx)
    .await
    .map_err(|e| table_error(EntityKind::Book, "insert", &e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::MissingOwner {
            title: book.title.clone(),
            owner: book.owner.clone(),
        });
    }
    Ok(())
}

async fn insert_in(
    tx: &mut Transaction<'static, Postgres>,
    kind: EntityKind,
    records: &[SeedRecord],
) -> Result<(), StoreError> {
    for record in records {
        match record {
            SeedRecord::User(user) if kind == EntityKind::User => insert_user(tx, user).await?,
            SeedRecord::Book(book) if kind == EntityKind::Book => insert_book(tx, book).await?,
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

async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), StoreError> {
    tx.commit().await.map_err(|e| StoreError::Transaction {
        reason: e.to_string(),
    })
}

#[async_trait::async_trait]
impl StoreHandle for PostgresStore {
    async fn create_schema_if_absent(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"CREATE TABLE IF NOT EXISTS users (
                id       SERIAL  PRIMARY KEY,
                username TEXT    NOT NULL UNIQUE,
                email    TEXT    NOT NULL,
                password TEXT    NOT NULL,
                admin    BOOLEAN NOT NULL DEFAULT FALSE
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable("create-schema", &e))?;

        sqlx::query(
            r"CREATE TABLE IF NOT EXISTS books (
                id             SERIAL  PRIMARY KEY,
                book_title     TEXT    NOT NULL UNIQUE,
                secret_content TEXT    NOT NULL,
                user_id        INTEGER NOT NULL REFERENCES users (id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable("create-schema", &e))?;

        debug!("postgres schema present");
        Ok(())
    }

    async fn has_any_record(&self, kind: EntityKind) -> Result<bool, StoreError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} LIMIT 1)", kind.table());
        let (exists,): (bool,) = sqlx::query_as(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| table_error(kind, "query", &e))?;
        Ok(exists)
    }

    async fn insert_records(
        &self,
        kind: EntityKind,
        records: &[SeedRecord],
    ) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        insert_in(&mut tx, kind, records).await?;
        commit(tx).await
    }

    async fn drop_all_schema(&self) -> Result<(), StoreError> {
        sqlx::query("DROP TABLE IF EXISTS books, users")
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("drop-schema", &e))?;
        debug!("postgres schema dropped");
        Ok(())
    }

    async fn count_records(&self, kind: EntityKind) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
        let (count,): (i64,) = sqlx::query_as(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| table_error(kind, "count", &e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn seed(&self, set: &SeedSet) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        insert_in(&mut tx, EntityKind::User, &set.records(EntityKind::User)).await?;
        insert_in(&mut tx, EntityKind::Book, &set.records(EntityKind::Book)).await?;
        commit(tx).await?;
        debug!(users = set.users.len(), books = set.books.len(), "seeded postgres tables");
        Ok(())
    }
}
