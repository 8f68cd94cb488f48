//! Error types for `vampi-core`.
//!
//! Configuration resolution has no error type: malformed input falls back
//! to defaults. Only store-facing operations fail outward.

use std::fmt;

use vampi_storage::StoreError;

/// The bootstrap step a store failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    CreateSchema,
    Query,
    Seed,
    DropSchema,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateSchema => "create-schema",
            Self::Query => "query",
            Self::Seed => "seed",
            Self::DropSchema => "drop-schema",
        })
    }
}

/// Errors from the bootstrap sequence.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The store could not complete a bootstrap step. The store is in an
    /// unknown state and must not be treated as ready.
    #[error("store unavailable during {step}: {source}")]
    StoreUnavailable {
        step: BootstrapStep,
        #[source]
        source: StoreError,
    },
}

impl BootstrapError {
    pub(crate) fn at(step: BootstrapStep) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::StoreUnavailable { step, source }
    }
}
