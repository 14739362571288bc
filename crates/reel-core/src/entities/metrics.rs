//! Metrics entity - optional satellite record with measured performance

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::value_objects::RecordId;

/// Measured performance of one submission.
///
/// Fields are optional because the record may be partially written; the
/// calculator falls back to the submission's own counters per field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub id: RecordId,
    pub submission_id: RecordId,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub engagement_rate: Option<Decimal>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Metrics {
    pub fn new(submission_id: RecordId, views: Option<u64>, likes: Option<u64>) -> Self {
        Self {
            id: submission_id.clone(),
            submission_id,
            views,
            likes,
            engagement_rate: None,
            updated_at: None,
        }
    }

    /// Whether this record should replace `other` for the same submission
    pub fn is_newer_than(&self, other: &Metrics) -> bool {
        match (self.updated_at, other.updated_at) {
            (Some(mine), Some(theirs)) => mine > theirs,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => self.id > other.id,
        }
    }
}
