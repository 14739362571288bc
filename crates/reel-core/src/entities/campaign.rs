//! Campaign entity - a restaurant's paid promotion offer

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::value_objects::RecordId;

/// Campaign owned by a single restaurant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    pub id: RecordId,
    pub restaurant_id: RecordId,
    pub title: String,
    pub description: String,
    /// Currency paid per 1,000 views
    pub reward_rate: Decimal,
    pub active: bool,
    /// Total spend ceiling across all submissions
    pub budget: Option<Decimal>,
    /// Maximum payout to a single influencer
    pub payout_cap: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Create an active campaign with no budget limits
    pub fn new(
        id: RecordId,
        restaurant_id: RecordId,
        title: impl Into<String>,
        reward_rate: Decimal,
    ) -> Self {
        Self {
            id,
            restaurant_id,
            title: title.into(),
            description: String::new(),
            reward_rate,
            active: true,
            budget: None,
            payout_cap: None,
            created_at: None,
        }
    }

    /// Check if a user owns this campaign
    #[inline]
    pub fn is_owner(&self, user_id: &RecordId) -> bool {
        &self.restaurant_id == user_id
    }

    /// Budget left after `spent`, floored at zero. `None` when unbounded.
    pub fn remaining_budget(&self, spent: Decimal) -> Option<Decimal> {
        self.budget.map(|budget| (budget - spent).max(Decimal::ZERO))
    }

    /// Whether `spent` exceeds the budget ceiling
    pub fn is_over_budget(&self, spent: Decimal) -> bool {
        self.budget.is_some_and(|budget| spent > budget)
    }
}
