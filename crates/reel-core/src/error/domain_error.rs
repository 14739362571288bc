//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::error::StoreError;
use crate::value_objects::RecordId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Campaign not found: {0}")]
    CampaignNotFound(RecordId),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(RecordId),

    #[error("User not found: {0}")]
    UserNotFound(RecordId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid submission status: {0}")]
    InvalidStatus(String),

    #[error("{field} must not be negative")]
    NegativeValue { field: &'static str },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    #[error("Not campaign owner")]
    NotCampaignOwner,

    #[error("Not submission owner")]
    NotSubmissionOwner,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Campaign is not accepting submissions")]
    CampaignInactive,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for display surfaces
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::CampaignNotFound(_) => "UNKNOWN_CAMPAIGN",
            Self::SubmissionNotFound(_) => "UNKNOWN_SUBMISSION",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::NegativeValue { .. } => "NEGATIVE_VALUE",

            // Authorization
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",
            Self::NotCampaignOwner => "NOT_CAMPAIGN_OWNER",
            Self::NotSubmissionOwner => "NOT_SUBMISSION_OWNER",

            // Business Rules
            Self::CampaignInactive => "CAMPAIGN_INACTIVE",

            // Infrastructure
            Self::Store(e) => e.code(),
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::CampaignNotFound(_) | Self::SubmissionNotFound(_) | Self::UserNotFound(_) => {
                true
            }
            Self::Store(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidStatus(_) | Self::NegativeValue { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::MissingPermission(_) | Self::NotCampaignOwner | Self::NotSubmissionOwner
        )
    }
}
