//! # reel-console
//!
//! Seeds a `MemoryStore` from a JSON file and renders the dashboard every
//! seeded user would see.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use reel_common::{AppConfig, AppError, AppResult};
use reel_core::{Collection, RecordId, RecordStore, User};
use reel_service::{Dashboard, DashboardView, Scope, ServiceContext, ServiceContextBuilder};
use reel_store::{FromDocument, MemoryStore, SeedData};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// One user's rendered dashboard
#[derive(Debug, Serialize)]
pub struct RoleReport {
    pub user_id: RecordId,
    pub name: String,
    pub view: DashboardView,
}

/// Read and parse a seed file
#[instrument]
pub async fn load_seed(path: &Path) -> AppResult<SeedData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))
        .map_err(AppError::internal)?;

    let seed = SeedData::from_json_str(&raw).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    info!(records = seed.len(), "Seed data loaded");
    Ok(seed)
}

/// Dashboards for every user with a known role, in id order
#[instrument(skip(ctx))]
pub async fn render_dashboards(ctx: &ServiceContext) -> AppResult<Vec<RoleReport>> {
    let users = User::from_documents(&ctx.store().read_all(Collection::Users).await?);

    let mut reports = Vec::with_capacity(users.len());
    for user in users {
        let scope = Scope::for_user(&user.id, user.role);
        if scope == Scope::Anonymous {
            warn!(user_id = %user.id, "Skipping user without a role");
            continue;
        }

        let mut dashboard = Dashboard::open(ctx, scope);
        let view = dashboard.view();
        dashboard.close();

        reports.push(RoleReport {
            name: user.label(),
            user_id: user.id,
            view,
        });
    }
    Ok(reports)
}

/// Seed a store from `seed_path` (or the configured one) and render every
/// user's dashboard
pub async fn run(config: AppConfig, seed_path: Option<PathBuf>) -> AppResult<Vec<RoleReport>> {
    let path = seed_path
        .or_else(|| config.seed.path.as_ref().map(PathBuf::from))
        .ok_or_else(|| AppError::InvalidInput("no seed file: pass a path or set SEED_FILE".into()))?;

    let seed = load_seed(&path).await?;
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::with_seed(seed));

    let ctx = ServiceContextBuilder::new()
        .store(store)
        .dashboard_config(config.dashboard)
        .build()?;

    render_dashboards(&ctx).await
}
