//! Dashboard - live, role-scoped derived view
//!
//! A dashboard owns four live queries (campaigns, submissions, metrics,
//! users) whose predicates depend on each other for restaurants and
//! influencers. Each call to [`Dashboard::view`] first brings the dependent
//! predicates up to date with the latest snapshots, then derives the view
//! from scratch.

use std::collections::BTreeSet;
use std::sync::Arc;

use reel_common::DashboardConfig;
use reel_core::{
    Campaign, Collection, Filter, Metrics, QueryKey, RecordId, RecordStore, Submission,
    SubmissionStatus, User,
};
use reel_store::FromDocument;
use serde::Serialize;
use tracing::{debug, instrument};

use super::scope::Scope;
use crate::aggregate::{
    Aggregator, CampaignSummary, Counts, EnrichedSubmission, Inputs, OpenCampaign, Rollups,
};
use crate::live::SubscriptionManager;
use crate::services::ServiceContext;

const CAMPAIGNS: &str = "campaigns";
const SUBMISSIONS: &str = "submissions";
const METRICS: &str = "metrics";
const METRICS_BY_ID: &str = "metrics_by_id";
const USERS: &str = "users";

/// Read-only view handed to display surfaces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub scope: Scope,
    pub submissions: Vec<EnrichedSubmission>,
    pub rollups: Rollups,
    pub campaigns: Vec<CampaignSummary>,
    pub open_campaigns: Vec<OpenCampaign>,
    pub counts: Counts,
    /// Some required query has not delivered its first result yet
    pub loading: bool,
    /// First failing query, if any; data from other queries is still shown
    pub error: Option<String>,
}

impl DashboardView {
    /// Apply a list filter to the enriched submissions
    pub fn filter(&self, filter: &SubmissionFilter) -> Vec<&EnrichedSubmission> {
        self.submissions.iter().filter(|s| filter.matches(s)).collect()
    }
}

/// Narrow the submission list by campaign and status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub campaign_id: Option<RecordId>,
    pub status: Option<SubmissionStatus>,
}

impl SubmissionFilter {
    pub fn campaign(mut self, campaign_id: impl Into<RecordId>) -> Self {
        self.campaign_id = Some(campaign_id.into());
        self
    }

    pub fn status(mut self, status: SubmissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, submission: &EnrichedSubmission) -> bool {
        self.campaign_id
            .as_ref()
            .map_or(true, |id| &submission.campaign_id == id)
            && self
                .status
                .as_ref()
                .map_or(true, |status| &submission.status == status)
    }
}

/// Live dashboard for one viewer
pub struct Dashboard {
    scope: Scope,
    config: DashboardConfig,
    live: SubscriptionManager,
}

impl Dashboard {
    /// Open the dashboard and its initial subscriptions
    pub fn new(store: Arc<dyn RecordStore>, scope: Scope, config: DashboardConfig) -> Self {
        let mut dashboard = Self {
            scope,
            config,
            live: SubscriptionManager::new(store),
        };
        dashboard.refresh();
        debug!(scope = %dashboard.scope, "Dashboard opened");
        dashboard
    }

    /// Open a dashboard on the context's store
    pub fn open(ctx: &ServiceContext, scope: Scope) -> Self {
        Self::new(ctx.store_handle(), scope, ctx.dashboard_config().clone())
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Subscription state, for inspection
    pub fn live(&self) -> &SubscriptionManager {
        &self.live
    }

    /// Bring every slot's predicate up to date with the latest snapshots.
    ///
    /// Restaurant submissions depend on owned campaigns; metrics and users
    /// depend on the visible submissions. Unchanged predicates keep their
    /// subscriptions, failed or not.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub fn refresh(&mut self) {
        self.follow(CAMPAIGNS, Collection::Campaigns, self.scope.campaigns_filter());

        let campaigns = self.campaigns();
        let owned: BTreeSet<&RecordId> = campaigns
            .iter()
            .filter(|c| self.scope.owns_campaign(c))
            .map(|c| &c.id)
            .collect();
        let filter = self.scope.submissions_filter(owned);
        self.follow(SUBMISSIONS, Collection::Submissions, filter);

        let submissions = self.submissions();
        let submission_ids = submissions.iter().map(|s| &s.id);
        let influencer_ids = submissions.iter().map(|s| &s.influencer_id);
        let metrics = self.scope.metrics_filter(submission_ids.clone());
        let metrics_by_id = self.scope.metrics_by_id_filter(submission_ids);
        let users = self.scope.users_filter(influencer_ids);
        self.follow(METRICS, Collection::Metrics, metrics);
        self.follow(METRICS_BY_ID, Collection::Metrics, metrics_by_id);
        self.follow(USERS, Collection::Users, users);
    }

    /// Point a slot at a predicate. A failed query on an unchanged predicate
    /// stays failed until [`Dashboard::retry`].
    fn follow(&mut self, slot: &str, collection: Collection, filter: Filter) {
        if self.live.key(slot) == Some(QueryKey::new(collection, &filter)) {
            return;
        }
        self.live.request(slot, collection, filter);
    }

    /// Re-open failed subscriptions
    pub fn retry(&mut self) {
        self.live.retry();
        self.refresh();
    }

    /// Current derived view
    pub fn view(&mut self) -> DashboardView {
        self.refresh();
        self.live.mark_seen();

        let campaigns = self.campaigns();
        let submissions = self.submissions();
        let metrics = self.metrics();
        let users = User::from_documents(&self.live.documents(USERS));

        let aggregate = Aggregator::new(&self.scope, &self.config.unresolved_campaign_label)
            .aggregate(Inputs {
                campaigns: &campaigns,
                submissions: &submissions,
                metrics: &metrics,
                users: &users,
            });

        DashboardView {
            scope: self.scope.clone(),
            submissions: aggregate.submissions,
            rollups: aggregate.rollups,
            campaigns: aggregate.campaigns,
            open_campaigns: aggregate.open_campaigns,
            counts: aggregate.counts,
            loading: self.live.is_loading(),
            error: self.live.error(),
        }
    }

    /// Enriched submissions narrowed by `filter`
    pub fn filtered(&mut self, filter: &SubmissionFilter) -> Vec<EnrichedSubmission> {
        self.view()
            .submissions
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect()
    }

    /// Wait for the next snapshot or error on any slot
    pub async fn changed(&mut self) {
        self.live.changed().await;
    }

    /// Tear down every subscription. Also happens on drop.
    pub fn close(&mut self) {
        self.live.release_all();
        debug!(scope = %self.scope, "Dashboard closed");
    }

    fn campaigns(&self) -> Vec<Campaign> {
        Campaign::from_documents(&self.live.documents(CAMPAIGNS))
    }

    fn submissions(&self) -> Vec<Submission> {
        Submission::from_documents(&self.live.documents(SUBMISSIONS))
    }

    /// Metrics from both lookups, each record once
    fn metrics(&self) -> Vec<Metrics> {
        let mut seen = BTreeSet::new();
        let mut documents = self.live.documents(METRICS);
        documents.extend(self.live.documents(METRICS_BY_ID));
        documents.retain(|doc| seen.insert(doc.id.clone()));
        Metrics::from_documents(&documents)
    }
}
