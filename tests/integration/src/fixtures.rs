//! Test fixtures and data generators
//!
//! Provides reusable record shapes as they appear in the store.

use std::sync::atomic::{AtomicU64, Ordering};

use reel_core::Fields;
use serde_json::{json, Value};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique record id with a readable prefix
pub fn unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", unique_suffix())
}

/// Convert a JSON object literal into a field map
pub fn object(value: Value) -> Fields {
    match value {
        Value::Object(fields) => fields,
        other => panic!("fixture must be a JSON object, got {other}"),
    }
}

/// Active campaign owned by `restaurant_id`
pub fn campaign(restaurant_id: &str, title: &str, reward_rate: Value) -> Fields {
    object(json!({
        "restaurant_id": restaurant_id,
        "title": title,
        "description": "",
        "reward_rate": reward_rate,
        "active_status": true,
    }))
}

/// Pending submission with no counts
pub fn submission(campaign_id: &str, influencer_id: &str) -> Fields {
    object(json!({
        "campaignId": campaign_id,
        "influencerId": influencer_id,
        "status": "pending",
    }))
}

/// Submission carrying its own view count
pub fn submission_with_views(campaign_id: &str, influencer_id: &str, views: u64) -> Fields {
    let mut fields = submission(campaign_id, influencer_id);
    fields.insert("views".into(), json!(views));
    fields
}

/// Metrics record for `submission_id`
pub fn metrics(submission_id: &str, views: u64, likes: u64) -> Fields {
    object(json!({
        "submission_id": submission_id,
        "views": views,
        "likes": likes,
    }))
}

/// Metrics record stored under the submission id, without a back reference
pub fn keyed_metrics(views: u64, likes: u64) -> Fields {
    object(json!({
        "views": views,
        "likes": likes,
    }))
}

/// User with a role and display name
pub fn user(role: &str, display_name: &str) -> Fields {
    object(json!({
        "role": role,
        "displayName": display_name,
    }))
}
