//! Campaign service
//!
//! Handles campaign creation, activation toggling and deletion.

use chrono::Utc;
use reel_core::{Campaign, Collection, DomainError, RecordId, UserRole};
use reel_store::{active_patch, CampaignInsert, FromDocument};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{CampaignResponse, CreateCampaignRequest};

use super::access::Actor;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Campaign service
pub struct CampaignService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CampaignService<'a> {
    /// Create a new CampaignService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a campaign owned by the acting restaurant
    #[instrument(skip(self, actor, request), fields(actor = %actor.user_id))]
    pub async fn create_campaign(
        &self,
        actor: &Actor,
        request: CreateCampaignRequest,
    ) -> ServiceResult<CampaignResponse> {
        request.validate()?;
        let title = request.title.trim();
        if title.is_empty() {
            return Err(ServiceError::validation("Title must be 1-100 characters"));
        }
        actor.require_role(&[UserRole::Restaurant], "create campaign")?;

        let mut campaign = Campaign::new(
            RecordId::default(),
            actor.user_id.clone(),
            title,
            request.reward_rate,
        );
        campaign.description = request.description.trim().to_string();
        campaign.budget = request.budget;
        campaign.payout_cap = request.payout_cap;
        campaign.active = request.active.unwrap_or(true);
        campaign.created_at = Some(Utc::now());

        campaign.id = self
            .ctx
            .store()
            .create(Collection::Campaigns, CampaignInsert::new(&campaign).into_fields())
            .await?;

        info!(campaign_id = %campaign.id, restaurant_id = %campaign.restaurant_id, "Campaign created");

        Ok(CampaignResponse::from(&campaign))
    }

    /// Get campaign entity by ID
    #[instrument(skip(self))]
    pub async fn get_campaign(&self, campaign_id: &RecordId) -> ServiceResult<Campaign> {
        let doc = self
            .ctx
            .store()
            .read(Collection::Campaigns, campaign_id)
            .await?
            .ok_or_else(|| DomainError::CampaignNotFound(campaign_id.clone()))?;

        Ok(Campaign::from_document(&doc))
    }

    /// Flip whether the campaign accepts submissions
    #[instrument(skip(self, actor), fields(actor = %actor.user_id))]
    pub async fn toggle_campaign_active(
        &self,
        actor: &Actor,
        campaign_id: &RecordId,
    ) -> ServiceResult<CampaignResponse> {
        let mut campaign = self.get_campaign(campaign_id).await?;
        actor.require_campaign_owner(&campaign)?;

        campaign.active = !campaign.active;
        self.ctx
            .store()
            .update(Collection::Campaigns, campaign_id, active_patch(campaign.active))
            .await?;

        info!(campaign_id = %campaign_id, active = campaign.active, "Campaign toggled");

        Ok(CampaignResponse::from(&campaign))
    }

    /// Delete a campaign. Its submissions stay and show a placeholder title.
    #[instrument(skip(self, actor), fields(actor = %actor.user_id))]
    pub async fn delete_campaign(&self, actor: &Actor, campaign_id: &RecordId) -> ServiceResult<()> {
        let campaign = self.get_campaign(campaign_id).await?;
        actor.require_campaign_owner(&campaign)?;

        self.ctx
            .store()
            .delete(Collection::Campaigns, campaign_id)
            .await?;

        info!(campaign_id = %campaign_id, "Campaign deleted");

        Ok(())
    }
}
