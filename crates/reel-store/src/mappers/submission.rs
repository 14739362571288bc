//! Submission entity <-> document mapper

use reel_core::{Document, Fields, Submission, SubmissionStatus};
use serde_json::Value;

use super::fields::submission as f;
use super::{
    decimal_value, id_field, opt_id_field, put_opt, string_field, timestamp_value, FromDocument,
};

impl FromDocument for Submission {
    fn from_document(doc: &Document) -> Self {
        Submission {
            id: doc.id.clone(),
            influencer_id: id_field(doc, f::INFLUENCER_ID),
            campaign_id: id_field(doc, f::CAMPAIGN_ID),
            restaurant_id: opt_id_field(doc, f::RESTAURANT_ID),
            content_url: string_field(doc, f::CONTENT_URL),
            status: doc
                .get_str(f::STATUS)
                .map(SubmissionStatus::parse)
                .unwrap_or_default(),
            views: doc.get_count(f::VIEWS),
            likes: doc.get_count(f::LIKES),
            earnings: doc.get_amount(f::EARNINGS),
            created_at: doc.get_timestamp(f::CREATED_AT),
        }
    }
}

/// Submission entity values for insertion
pub struct SubmissionInsert<'a> {
    submission: &'a Submission,
}

impl<'a> SubmissionInsert<'a> {
    pub fn new(submission: &'a Submission) -> Self {
        Self { submission }
    }

    pub fn into_fields(self) -> Fields {
        let s = self.submission;
        let mut fields = Fields::new();
        fields.insert(f::INFLUENCER_ID.into(), Value::String(s.influencer_id.to_string()));
        fields.insert(f::CAMPAIGN_ID.into(), Value::String(s.campaign_id.to_string()));
        put_opt(&mut fields, f::RESTAURANT_ID, s.restaurant_id.as_ref(), |id| {
            Value::String(id.to_string())
        });
        put_opt(&mut fields, f::CONTENT_URL, s.content_url.clone(), Value::String);
        fields.insert(f::STATUS.into(), Value::String(s.status.to_string()));
        fields.insert(f::VIEWS.into(), Value::from(s.views.unwrap_or(0)));
        fields.insert(f::LIKES.into(), Value::from(s.likes.unwrap_or(0)));
        put_opt(&mut fields, f::EARNINGS, s.earnings, decimal_value);
        put_opt(&mut fields, f::CREATED_AT, s.created_at, timestamp_value);
        fields
    }
}

/// Patch setting the review status
pub fn status_patch(status: &SubmissionStatus) -> Fields {
    let mut fields = Fields::new();
    fields.insert(f::STATUS.into(), Value::String(status.to_string()));
    fields
}
