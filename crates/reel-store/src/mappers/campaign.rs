//! Campaign entity <-> document mapper

use reel_core::{Campaign, Document, Fields};
use serde_json::Value;

use super::fields::campaign as f;
use super::{decimal_value, id_field, put_opt, string_field, timestamp_value, FromDocument};

impl FromDocument for Campaign {
    fn from_document(doc: &Document) -> Self {
        Campaign {
            id: doc.id.clone(),
            restaurant_id: id_field(doc, f::RESTAURANT_ID),
            title: string_field(doc, f::TITLE).unwrap_or_default(),
            description: string_field(doc, f::DESCRIPTION).unwrap_or_default(),
            reward_rate: doc.get_amount(f::REWARD_RATE).unwrap_or_default(),
            active: doc.get_bool(f::ACTIVE).unwrap_or(false),
            budget: doc.get_amount(f::BUDGET),
            payout_cap: doc.get_amount(f::PAYOUT_CAP),
            created_at: doc.get_timestamp(f::CREATED_AT),
        }
    }
}

/// Campaign entity values for insertion
pub struct CampaignInsert<'a> {
    campaign: &'a Campaign,
}

impl<'a> CampaignInsert<'a> {
    pub fn new(campaign: &'a Campaign) -> Self {
        Self { campaign }
    }

    pub fn into_fields(self) -> Fields {
        let c = self.campaign;
        let mut fields = Fields::new();
        fields.insert(f::RESTAURANT_ID.into(), Value::String(c.restaurant_id.to_string()));
        fields.insert(f::TITLE.into(), Value::String(c.title.clone()));
        fields.insert(f::DESCRIPTION.into(), Value::String(c.description.clone()));
        fields.insert(f::REWARD_RATE.into(), decimal_value(c.reward_rate));
        fields.insert(f::ACTIVE.into(), Value::Bool(c.active));
        put_opt(&mut fields, f::BUDGET, c.budget, decimal_value);
        put_opt(&mut fields, f::PAYOUT_CAP, c.payout_cap, decimal_value);
        put_opt(&mut fields, f::CREATED_AT, c.created_at, timestamp_value);
        fields
    }
}

/// Patch flipping the active flag
pub fn active_patch(active: bool) -> Fields {
    let mut fields = Fields::new();
    fields.insert(f::ACTIVE.into(), Value::Bool(active));
    fields
}
