//! Application state for the HR engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::MemoryStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration and the record store.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<ConfigLoader>,
    /// The record store.
    store: Arc<MemoryStore>,
}

impl AppState {
    /// Creates application state with the given configuration and an empty store.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_store(config, MemoryStore::new())
    }

    /// Creates application state around an existing store.
    pub fn with_store(config: ConfigLoader, store: MemoryStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the record store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_one_store() {
        let state = AppState::new(ConfigLoader::default());
        let clone = state.clone();
        assert!(std::ptr::eq(state.store(), clone.store()));
    }
}
