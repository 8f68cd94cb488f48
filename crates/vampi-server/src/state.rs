//! Shared application state for the `VAmPI` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::sync::Arc;

use vampi_core::bootstrap::BootstrapSequencer;
use vampi_core::config::RuntimeConfig;
use vampi_storage::StoreHandle;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Configuration resolved at startup. Never re-read.
    pub config: RuntimeConfig,
    /// Seeding paths over the backing store.
    pub sequencer: BootstrapSequencer,
}

impl AppState {
    pub fn new(config: RuntimeConfig, store: Arc<dyn StoreHandle>) -> Self {
        Self {
            config,
            sequencer: BootstrapSequencer::new(store),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
