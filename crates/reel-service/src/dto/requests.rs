//! Request DTOs for mutations
//!
//! All request DTOs implement `Deserialize` and `Validate`. Services call
//! `validate()` before touching the store.

use reel_core::SubmissionStatus;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

// ============================================================================
// Validators
// ============================================================================

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative")
            .with_message("Amounts must not be negative".into()));
    }
    Ok(())
}

fn assignable_status(value: &str) -> Result<(), ValidationError> {
    if SubmissionStatus::parse(value).is_assignable() && !value.trim().is_empty() {
        return Ok(());
    }
    Err(ValidationError::new("status").with_message(
        format!("Status must be one of pending, submitted, approved, rejected (got {value:?})")
            .into(),
    ))
}

// ============================================================================
// Campaign Requests
// ============================================================================

/// Create campaign request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    /// Currency per 1000 views
    #[validate(custom(function = "non_negative"))]
    pub reward_rate: Decimal,

    #[validate(custom(function = "non_negative"))]
    pub budget: Option<Decimal>,

    /// Per-influencer payout limit
    #[validate(custom(function = "non_negative"))]
    pub payout_cap: Option<Decimal>,

    /// Defaults to active
    pub active: Option<bool>,
}

// ============================================================================
// Submission Requests
// ============================================================================

/// Influencer applies to a campaign with a piece of content
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitContentRequest {
    #[validate(length(min = 1, message = "Campaign id is required"))]
    pub campaign_id: String,

    #[validate(url(message = "Content URL must be a valid URL"))]
    pub content_url: String,
}

/// Reviewer sets a submission's status
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(custom(function = "assignable_status"))]
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Admin edits a submission's tracked counts.
/// Signed so that negative input is reported rather than failing to parse.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMetricsRequest {
    #[validate(range(min = 0, message = "Views must not be negative"))]
    pub views: i64,

    #[validate(range(min = 0, message = "Likes must not be negative"))]
    pub likes: i64,
}
