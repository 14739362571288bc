//! Actor identity and mutation authorization
//!
//! Every check here runs before the write it guards. Admins pass all of
//! them.

use reel_core::{Campaign, DomainError, RecordId, Submission, UserRole};
use serde::{Deserialize, Serialize};

use super::error::{ServiceError, ServiceResult};

/// The signed-in user performing a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: RecordId,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<RecordId>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn admin(user_id: impl Into<RecordId>) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    pub fn restaurant(user_id: impl Into<RecordId>) -> Self {
        Self::new(user_id, UserRole::Restaurant)
    }

    pub fn influencer(user_id: impl Into<RecordId>) -> Self {
        Self::new(user_id, UserRole::Influencer)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Require one of `roles` (admins always pass)
    pub fn require_role(&self, roles: &[UserRole], action: &str) -> ServiceResult<()> {
        if self.is_admin() || roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ServiceError::permission_denied(format!(
                "{action} (role {})",
                self.role.as_str()
            )))
        }
    }

    /// Campaign toggle and delete: the owning restaurant
    pub fn require_campaign_owner(&self, campaign: &Campaign) -> ServiceResult<()> {
        if self.is_admin() || campaign.is_owner(&self.user_id) {
            Ok(())
        } else {
            Err(DomainError::NotCampaignOwner.into())
        }
    }

    /// Submission delete: the influencer who submitted it
    pub fn require_submitter(&self, submission: &Submission) -> ServiceResult<()> {
        if self.is_admin() || submission.is_owned_by(&self.user_id) {
            Ok(())
        } else {
            Err(DomainError::NotSubmissionOwner.into())
        }
    }
}
