//! Document <-> entity mappers
//!
//! This module provides conversions between store documents and domain entities (reel-core).
//! - `FromDocument`: decode a document into an entity, coercing loose values
//! - `*Insert`/`*Upsert` structs: prepare entity data as a field map for writes

mod campaign;
pub mod fields;
mod metrics;
mod submission;
mod user;

pub use campaign::{active_patch, CampaignInsert};
pub use metrics::MetricsUpsert;
pub use submission::{status_patch, SubmissionInsert};
pub use user::UserInsert;

use chrono::{DateTime, SecondsFormat, Utc};
use reel_core::{Document, Fields, RecordId};
use rust_decimal::Decimal;
use serde_json::Value;

/// Decode an entity from a store document
pub trait FromDocument: Sized {
    fn from_document(doc: &Document) -> Self;

    /// Decode every document of a snapshot
    fn from_documents(docs: &[Document]) -> Vec<Self> {
        docs.iter().map(Self::from_document).collect()
    }
}

fn id_field(doc: &Document, field: &str) -> RecordId {
    doc.get_str(field).map(RecordId::from).unwrap_or_default()
}

fn opt_id_field(doc: &Document, field: &str) -> Option<RecordId> {
    doc.get_str(field).map(RecordId::from)
}

fn string_field(doc: &Document, field: &str) -> Option<String> {
    doc.get_str(field).map(str::to_string)
}

fn decimal_value(value: Decimal) -> Value {
    Value::String(value.normalize().to_string())
}

fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn put_opt<T>(fields: &mut Fields, key: &str, value: Option<T>, encode: impl Fn(T) -> Value) {
    if let Some(value) = value {
        fields.insert(key.to_string(), encode(value));
    }
}
