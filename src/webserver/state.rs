/// Shared application state for the webserver
///
/// Holds the loaded configuration and the hospital store that every route
/// handler and stream producer reads from.
use std::sync::Arc;

use crate::config::Config;
use crate::store::HospitalStore;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Arc<HospitalStore>,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<HospitalStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            startup_time: chrono::Utc::now(),
        }
    }

    /// State with a freshly bootstrapped store, as built at startup
    pub fn bootstrap(config: Config) -> Self {
        let store = Arc::new(HospitalStore::bootstrap(config.queue.clone()));
        Self::new(config, store)
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (chrono::Utc::now() - self.startup_time)
            .num_seconds()
            .max(0) as u64
    }
}
