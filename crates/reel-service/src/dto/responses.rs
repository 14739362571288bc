//! Response DTOs for mutation results
//!
//! Amounts serialize as decimal strings, timestamps as RFC 3339.

use chrono::{DateTime, Utc};
use reel_core::{Campaign, RecordId, Submission, SubmissionStatus};
use reel_store::MetricsUpsert;
use rust_decimal::Decimal;
use serde::Serialize;

/// Campaign as written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignResponse {
    pub id: RecordId,
    pub restaurant_id: RecordId,
    pub title: String,
    pub description: String,
    pub reward_rate: Decimal,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_cap: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Campaign> for CampaignResponse {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id.clone(),
            restaurant_id: c.restaurant_id.clone(),
            title: c.title.clone(),
            description: c.description.clone(),
            reward_rate: c.reward_rate,
            active: c.active,
            budget: c.budget,
            payout_cap: c.payout_cap,
            created_at: c.created_at,
        }
    }
}

/// Submission as written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResponse {
    pub id: RecordId,
    pub campaign_id: RecordId,
    pub influencer_id: RecordId,
    pub restaurant_id: Option<RecordId>,
    pub content_url: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Submission> for SubmissionResponse {
    fn from(s: &Submission) -> Self {
        Self {
            id: s.id.clone(),
            campaign_id: s.campaign_id.clone(),
            influencer_id: s.influencer_id.clone(),
            restaurant_id: s.restaurant_id.clone(),
            content_url: s.content_url.clone(),
            status: s.status.clone(),
            created_at: s.created_at,
        }
    }
}

/// Metrics record as written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsResponse {
    pub submission_id: RecordId,
    pub views: u64,
    pub likes: u64,
    pub engagement_rate: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&MetricsUpsert<'_>> for MetricsResponse {
    fn from(m: &MetricsUpsert<'_>) -> Self {
        Self {
            submission_id: RecordId::new(m.submission_id),
            views: m.views,
            likes: m.likes,
            engagement_rate: m.engagement_rate,
            updated_at: Some(m.updated_at),
        }
    }
}
