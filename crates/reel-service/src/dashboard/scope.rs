//! Viewer scope
//!
//! Decides which records a viewer sees and which store predicates feed
//! each dashboard slot.

use std::collections::BTreeSet;
use std::fmt;

use reel_core::{Campaign, Filter, RecordId, Submission, UserRole, DOCUMENT_ID};
use reel_store::fields;
use serde::Serialize;

use crate::services::Actor;

/// Who is looking at the data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Scope {
    /// Own submissions only
    Influencer(RecordId),
    /// Submissions to campaigns the restaurant owns
    Restaurant(RecordId),
    /// Everything
    Admin,
    /// Nothing at all; no store queries are issued
    Anonymous,
}

impl Scope {
    /// Scope for a signed-in user; unknown roles see nothing
    pub fn for_user(user_id: &RecordId, role: Option<UserRole>) -> Self {
        match role {
            Some(UserRole::Influencer) => Self::Influencer(user_id.clone()),
            Some(UserRole::Restaurant) => Self::Restaurant(user_id.clone()),
            Some(UserRole::Admin) => Self::Admin,
            None => Self::Anonymous,
        }
    }

    pub fn role_name(&self) -> &'static str {
        match self {
            Self::Influencer(_) => "influencer",
            Self::Restaurant(_) => "restaurant",
            Self::Admin => "admin",
            Self::Anonymous => "anonymous",
        }
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Campaigns summarized and counted for this viewer
    pub fn owns_campaign(&self, campaign: &Campaign) -> bool {
        match self {
            Self::Restaurant(id) => campaign.is_owner(id),
            Self::Admin => true,
            Self::Influencer(_) | Self::Anonymous => false,
        }
    }

    /// Whether a submission belongs in this viewer's list.
    /// `owned` holds the ids of campaigns the viewer owns.
    pub fn sees_submission(&self, submission: &Submission, owned: &BTreeSet<&RecordId>) -> bool {
        match self {
            Self::Influencer(id) => submission.is_owned_by(id),
            Self::Restaurant(_) => owned.contains(&submission.campaign_id),
            Self::Admin => true,
            Self::Anonymous => false,
        }
    }

    // =========================================================================
    // Store predicates
    // =========================================================================

    pub(crate) fn campaigns_filter(&self) -> Filter {
        match self {
            Self::Restaurant(id) => Filter::eq(fields::campaign::RESTAURANT_ID, id),
            Self::Influencer(_) | Self::Admin => Filter::all(),
            Self::Anonymous => Filter::nothing(),
        }
    }

    /// `owned` is only consulted for restaurants; owning nothing means
    /// querying nothing
    pub(crate) fn submissions_filter<'a>(
        &self,
        owned: impl IntoIterator<Item = &'a RecordId>,
    ) -> Filter {
        match self {
            Self::Influencer(id) => Filter::eq(fields::submission::INFLUENCER_ID, id),
            Self::Restaurant(_) => Filter::is_in(fields::submission::CAMPAIGN_ID, owned),
            Self::Admin => Filter::all(),
            Self::Anonymous => Filter::nothing(),
        }
    }

    /// Metrics naming a visible submission in their back reference
    pub(crate) fn metrics_filter<'a>(
        &self,
        submission_ids: impl IntoIterator<Item = &'a RecordId>,
    ) -> Filter {
        match self {
            Self::Influencer(_) | Self::Restaurant(_) => {
                Filter::is_in(fields::metrics::SUBMISSION_ID, submission_ids)
            }
            Self::Admin => Filter::all(),
            Self::Anonymous => Filter::nothing(),
        }
    }

    /// Metrics stored under a visible submission's id. Such records may
    /// omit the back reference; admins already read them through
    /// [`Scope::metrics_filter`].
    pub(crate) fn metrics_by_id_filter<'a>(
        &self,
        submission_ids: impl IntoIterator<Item = &'a RecordId>,
    ) -> Filter {
        match self {
            Self::Influencer(_) | Self::Restaurant(_) => {
                Filter::is_in(DOCUMENT_ID, submission_ids)
            }
            Self::Admin | Self::Anonymous => Filter::nothing(),
        }
    }

    pub(crate) fn users_filter<'a>(
        &self,
        influencer_ids: impl IntoIterator<Item = &'a RecordId>,
    ) -> Filter {
        match self {
            Self::Influencer(id) => Filter::eq(DOCUMENT_ID, id),
            Self::Restaurant(_) => Filter::is_in(DOCUMENT_ID, influencer_ids),
            Self::Admin => Filter::all(),
            Self::Anonymous => Filter::nothing(),
        }
    }
}

impl From<&Actor> for Scope {
    fn from(actor: &Actor) -> Self {
        Self::for_user(&actor.user_id, Some(actor.role))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Influencer(id) | Self::Restaurant(id) => write!(f, "{}:{id}", self.role_name()),
            Self::Admin | Self::Anonymous => f.write_str(self.role_name()),
        }
    }
}
