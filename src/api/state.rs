//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::runner::PayrollRunner;
use crate::session::{SessionCache, StaticSessionSource};
use crate::store::MemoryStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// configuration, the store, the batch runner over that store, and the
/// session cache.
#[derive(Clone)]
pub struct AppState {
    config: Arc<EngineConfig>,
    store: Arc<MemoryStore>,
    runner: Arc<PayrollRunner<MemoryStore>>,
    session: Arc<SessionCache<StaticSessionSource>>,
}

impl AppState {
    /// Creates a new application state serving `store`.
    pub fn new(config: EngineConfig, store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let runner = PayrollRunner::new(store.clone(), config.calculation.clone());
        let session = SessionCache::from_config(&config.session);

        Self {
            config: Arc::new(config),
            store,
            runner: Arc::new(runner),
            session: Arc::new(session),
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Returns the batch runner.
    pub fn runner(&self) -> &PayrollRunner<MemoryStore> {
        &self.runner
    }

    /// Returns the session cache.
    pub fn session(&self) -> &SessionCache<StaticSessionSource> {
        &self.session
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
    fn test_runner_uses_calculation_config() {
        let mut config = EngineConfig::default();
        config.calculation.currency_scale = 2;

        let state = AppState::new(config, MemoryStore::new());
        assert_eq!(state.runner().config().currency_scale, 2);
    }
}
