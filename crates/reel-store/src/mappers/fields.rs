//! Stored field names per collection

pub mod campaign {
    pub const RESTAURANT_ID: &str = "restaurant_id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const REWARD_RATE: &str = "reward_rate";
    pub const ACTIVE: &str = "active_status";
    pub const BUDGET: &str = "budget";
    pub const PAYOUT_CAP: &str = "payout_cap";
    pub const CREATED_AT: &str = "created_at";
}

pub mod submission {
    pub const INFLUENCER_ID: &str = "influencerId";
    pub const CAMPAIGN_ID: &str = "campaignId";
    pub const RESTAURANT_ID: &str = "restaurantId";
    pub const CONTENT_URL: &str = "contentUrl";
    pub const STATUS: &str = "status";
    pub const VIEWS: &str = "views";
    pub const LIKES: &str = "likes";
    pub const EARNINGS: &str = "earnings";
    pub const CREATED_AT: &str = "createdAt";
}

pub mod metrics {
    pub const SUBMISSION_ID: &str = "submission_id";
    pub const VIEWS: &str = "views";
    pub const LIKES: &str = "likes";
    pub const ENGAGEMENT_RATE: &str = "engagement_rate";
    pub const UPDATED_AT: &str = "updated_at";
}

pub mod user {
    pub const EMAIL: &str = "email";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const USERNAME: &str = "username";
    pub const ROLE: &str = "role";
}
