//! Test helpers for integration tests
//!
//! Provides a store-plus-context world, record seeding, and waiting on
//! dashboard notifications.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use reel_common::DashboardConfig;
use reel_core::{Collection, Fields, RecordId, RecordStore};
use reel_service::{Dashboard, DashboardView, Scope, ServiceContext};
use reel_store::MemoryStore;

/// How long to wait for a notification before failing
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// A fresh in-memory store with a service context over it
pub struct TestWorld {
    pub store: Arc<MemoryStore>,
    pub ctx: ServiceContext,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        let store = MemoryStore::new_shared();
        let ctx = ServiceContext::new(store.clone(), config);
        Self { store, ctx }
    }

    /// Write a record under a known id
    pub async fn put(&self, collection: Collection, id: &str, fields: Fields) -> Result<()> {
        self.store.set(collection, &RecordId::new(id), fields).await?;
        Ok(())
    }

    /// Remove a record
    pub async fn remove(&self, collection: Collection, id: &str) -> Result<()> {
        self.store.delete(collection, &RecordId::new(id)).await?;
        Ok(())
    }

    pub fn dashboard(&self, scope: Scope) -> Dashboard {
        Dashboard::open(&self.ctx, scope)
    }

    pub fn restaurant(&self, id: &str) -> Dashboard {
        self.dashboard(Scope::Restaurant(RecordId::new(id)))
    }

    pub fn influencer(&self, id: &str) -> Dashboard {
        self.dashboard(Scope::Influencer(RecordId::new(id)))
    }

    pub fn admin(&self) -> Dashboard {
        self.dashboard(Scope::Admin)
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for the dashboard to be notified, then render it
pub async fn next_view(dashboard: &mut Dashboard) -> Result<DashboardView> {
    if tokio::time::timeout(NOTIFY_TIMEOUT, dashboard.changed())
        .await
        .is_err()
    {
        bail!("dashboard was not notified within {NOTIFY_TIMEOUT:?}");
    }
    Ok(dashboard.view())
}
