//! Application state for the HTTP server.

use std::sync::Arc;

use qknot_hal::ServiceConnector;
use qknot_jobs::{JobLifecycleManager, JobManagerConfig};

use crate::config::ServerConfig;

/// Shared, immutable application state.
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Job lifecycle manager bound to the runtime connector.
    pub manager: JobLifecycleManager,
}

impl AppState {
    /// State with the default job manager settings.
    pub fn new(config: ServerConfig, connector: Arc<dyn ServiceConnector>) -> Self {
        Self::with_manager(config, JobLifecycleManager::new(connector))
    }

    /// State with custom job manager settings.
    pub fn with_job_config(
        config: ServerConfig,
        connector: Arc<dyn ServiceConnector>,
        jobs: JobManagerConfig,
    ) -> Self {
        Self::with_manager(config, JobLifecycleManager::with_config(connector, jobs))
    }

    /// State around a prepared manager.
    pub fn with_manager(config: ServerConfig, manager: JobLifecycleManager) -> Self {
        Self { config, manager }
    }
}
