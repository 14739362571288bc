//! Service context - dependency container for services

use std::sync::Arc;

use reel_common::DashboardConfig;
use reel_core::RecordStore;

use super::error::{ServiceError, ServiceResult};

/// Service context shared by mutation services and dashboards
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn RecordStore>,
    dashboard: DashboardConfig,
}

impl ServiceContext {
    pub fn new(store: Arc<dyn RecordStore>, dashboard: DashboardConfig) -> Self {
        Self { store, dashboard }
    }

    // === Store ===

    /// Get the record store
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Shared handle to the record store, for long-lived subscribers
    pub fn store_handle(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    // === Configuration ===

    pub fn dashboard_config(&self) -> &DashboardConfig {
        &self.dashboard
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"dyn RecordStore")
            .field("dashboard", &self.dashboard)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn RecordStore>>,
    dashboard: Option<DashboardConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn dashboard_config(mut self, config: DashboardConfig) -> Self {
        self.dashboard = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the store is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.dashboard.unwrap_or_default(),
        ))
    }
}
