//! Metrics entity <-> document mapper

use chrono::{DateTime, Utc};
use reel_core::{Document, Fields, Metrics};
use rust_decimal::Decimal;
use serde_json::Value;

use super::fields::metrics as f;
use super::{decimal_value, opt_id_field, timestamp_value, FromDocument};

impl FromDocument for Metrics {
    fn from_document(doc: &Document) -> Self {
        Metrics {
            id: doc.id.clone(),
            // Records written by submission id may omit the back reference
            submission_id: opt_id_field(doc, f::SUBMISSION_ID).unwrap_or_else(|| doc.id.clone()),
            views: doc.get_count(f::VIEWS),
            likes: doc.get_count(f::LIKES),
            engagement_rate: doc.get_amount(f::ENGAGEMENT_RATE),
            updated_at: doc.get_timestamp(f::UPDATED_AT),
        }
    }
}

/// Values merged into a metrics record keyed by submission id
pub struct MetricsUpsert<'a> {
    pub submission_id: &'a str,
    pub views: u64,
    pub likes: u64,
    pub engagement_rate: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl MetricsUpsert<'_> {
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(f::SUBMISSION_ID.into(), Value::String(self.submission_id.to_string()));
        fields.insert(f::VIEWS.into(), Value::from(self.views));
        fields.insert(f::LIKES.into(), Value::from(self.likes));
        fields.insert(f::ENGAGEMENT_RATE.into(), decimal_value(self.engagement_rate));
        fields.insert(f::UPDATED_AT.into(), timestamp_value(self.updated_at));
        fields
    }
}
