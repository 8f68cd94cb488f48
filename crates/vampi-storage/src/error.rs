//! Store error types.
//!
//! Every variant carries enough context to diagnose the failing operation
//! without a debugger.

use crate::record::EntityKind;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the operation.
    #[error("store unavailable during {operation}: {reason}")]
    Unavailable { operation: String, reason: String },

    /// A table was queried or written before the schema was created.
    #[error("schema is not materialized: missing table '{table}'")]
    MissingSchema { table: String },

    /// An insert batch contained a record of the wrong entity kind.
    #[error("cannot insert a '{actual}' record into '{expected}'")]
    KindMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },

    /// A book referenced an owner that does not exist.
    #[error("book '{title}' references unknown owner '{owner}'")]
    MissingOwner { title: String, owner: String },

    /// A uniqueness or integrity constraint was violated.
    #[error("constraint violated on '{table}': {reason}")]
    Constraint { table: String, reason: String },

    /// Failed to begin or commit a transaction.
    #[error("transaction failed: {reason}")]
    Transaction { reason: String },
}
