//! Derived view types
//!
//! Serialized as-is by display surfaces. Money serializes as decimal strings.

use chrono::{DateTime, Utc};
use reel_core::{RecordId, Resolved, SubmissionStatus};
use rust_decimal::Decimal;
use serde::Serialize;

/// One submission joined with its campaign, metrics and influencer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSubmission {
    pub id: RecordId,
    pub campaign_id: RecordId,
    /// Campaign title, or the unresolved placeholder
    pub campaign_title: String,
    pub campaign_resolved: bool,
    pub influencer_id: RecordId,
    /// Display name, username, email, or the raw id
    pub influencer_name: String,
    pub restaurant_id: Option<RecordId>,
    pub status: SubmissionStatus,
    pub content_url: Option<String>,
    /// Host of the content URL for compact display
    pub content_domain: Option<String>,
    pub views: Resolved<u64>,
    pub likes: Resolved<u64>,
    pub earnings: Resolved<Decimal>,
    /// Rate used for computed earnings; zero when the campaign is unresolved
    pub reward_rate: Decimal,
    pub engagement_rate: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

impl EnrichedSubmission {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Totals over a set of submissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rollups {
    /// Submissions in an active status
    pub count: usize,
    pub total: usize,
    pub views: u64,
    pub likes: u64,
    pub earnings: Decimal,
}

impl Rollups {
    pub fn add(&mut self, submission: &EnrichedSubmission) {
        self.total += 1;
        if submission.is_active() {
            self.count += 1;
        }
        self.views = self.views.saturating_add(submission.views.value);
        self.likes = self.likes.saturating_add(submission.likes.value);
        self.earnings = self.earnings.saturating_add(submission.earnings.value);
    }
}

impl<'a> FromIterator<&'a EnrichedSubmission> for Rollups {
    fn from_iter<I: IntoIterator<Item = &'a EnrichedSubmission>>(iter: I) -> Self {
        let mut rollups = Self::default();
        for submission in iter {
            rollups.add(submission);
        }
        rollups
    }
}

/// Spend and performance of one campaign
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub campaign_id: RecordId,
    pub title: String,
    pub active: bool,
    pub reward_rate: Decimal,
    pub rollups: Rollups,
    pub budget: Option<Decimal>,
    /// Budget left after spend, floored at zero
    pub budget_remaining: Option<Decimal>,
    pub over_budget: bool,
    pub payout_cap: Option<Decimal>,
    /// Influencers whose combined earnings exceed the payout cap
    pub influencers_over_cap: Vec<RecordId>,
}

/// A campaign an influencer can apply to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenCampaign {
    pub id: RecordId,
    pub restaurant_id: RecordId,
    pub title: String,
    pub description: String,
    pub reward_rate: Decimal,
    /// The viewer already has a submission for it
    pub applied: bool,
}

/// Record counts visible in the scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub users: usize,
    pub campaigns: usize,
    pub active_campaigns: usize,
    pub submissions: usize,
}

/// Everything derived from one set of snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub submissions: Vec<EnrichedSubmission>,
    pub rollups: Rollups,
    pub campaigns: Vec<CampaignSummary>,
    pub open_campaigns: Vec<OpenCampaign>,
    pub counts: Counts,
}
