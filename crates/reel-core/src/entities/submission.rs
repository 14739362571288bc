//! Submission entity - an influencer's content entered into a campaign

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::RecordId;

/// Review status of a submission.
///
/// `Joined` is a legacy value still present in older records. Values the
/// system does not recognize are preserved in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Submitted,
    Joined,
    Approved,
    Rejected,
    Other(String),
}

impl SubmissionStatus {
    /// Statuses a reviewer may assign
    pub const ASSIGNABLE: [SubmissionStatus; 4] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Submitted,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
    ];

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "" => Self::Pending,
            "submitted" => Self::Submitted,
            "joined" => Self::Joined,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Joined => "joined",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Other(s) => s,
        }
    }

    /// Counted towards the "active" rollup
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Submitted | Self::Joined | Self::Approved
        )
    }

    /// Can be written by a status change
    #[inline]
    pub fn is_assignable(&self) -> bool {
        Self::ASSIGNABLE.contains(self)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SubmissionStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<SubmissionStatus> for String {
    fn from(status: SubmissionStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Submission entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: RecordId,
    pub influencer_id: RecordId,
    pub campaign_id: RecordId,
    /// Campaign owner, copied from the campaign when the submission was made
    pub restaurant_id: Option<RecordId>,
    pub content_url: Option<String>,
    pub status: SubmissionStatus,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    /// Stored payout that overrides the formula when present
    pub earnings: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn new(id: RecordId, influencer_id: RecordId, campaign_id: RecordId) -> Self {
        Self {
            id,
            influencer_id,
            campaign_id,
            restaurant_id: None,
            content_url: None,
            status: SubmissionStatus::Pending,
            views: None,
            likes: None,
            earnings: None,
            created_at: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    #[inline]
    pub fn is_owned_by(&self, influencer_id: &RecordId) -> bool {
        &self.influencer_id == influencer_id
    }

    /// Host of the content URL without a leading `www.`
    pub fn content_domain(&self) -> Option<String> {
        let url = self.content_url.as_deref()?;
        let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
        let host = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('@')
            .next()
            .unwrap_or_default();
        let host = host.split(':').next().unwrap_or_default();
        let host = host.strip_prefix("www.").unwrap_or(host);
        (!host.is_empty()).then(|| host.to_ascii_lowercase())
    }
}
