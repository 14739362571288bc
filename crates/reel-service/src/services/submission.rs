//! Submission service
//!
//! Handles content submission, review status changes, metrics edits and
//! deletion.

use chrono::Utc;
use reel_core::{
    engagement_rate, Collection, DomainError, Filter, RecordId, Submission, SubmissionStatus,
    UserRole,
};
use reel_store::{fields, status_patch, FromDocument, MetricsUpsert, SubmissionInsert};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::dto::{
    MetricsResponse, SubmissionResponse, SubmitContentRequest, UpdateMetricsRequest,
    UpdateStatusRequest,
};

use super::access::Actor;
use super::campaign::CampaignService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Submission service
pub struct SubmissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SubmissionService<'a> {
    /// Create a new SubmissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply to an active campaign with a piece of content
    #[instrument(skip(self, actor, request), fields(actor = %actor.user_id))]
    pub async fn submit_content(
        &self,
        actor: &Actor,
        request: SubmitContentRequest,
    ) -> ServiceResult<SubmissionResponse> {
        request.validate()?;
        actor.require_role(&[UserRole::Influencer], "submit content")?;

        let campaign_id = RecordId::new(request.campaign_id.trim());
        let campaign = CampaignService::new(self.ctx)
            .get_campaign(&campaign_id)
            .await?;
        if !campaign.active {
            return Err(DomainError::CampaignInactive.into());
        }

        let existing = self
            .ctx
            .store()
            .read_filtered(
                Collection::Submissions,
                &Filter::eq(fields::submission::CAMPAIGN_ID, &campaign_id)
                    .and_eq(fields::submission::INFLUENCER_ID, &actor.user_id),
            )
            .await?;
        if !existing.is_empty() {
            return Err(ServiceError::validation("Already applied to this campaign"));
        }

        let mut submission = Submission::new(RecordId::default(), actor.user_id.clone(), campaign_id);
        submission.restaurant_id = Some(campaign.restaurant_id.clone());
        submission.content_url = Some(request.content_url);
        submission.views = Some(0);
        submission.likes = Some(0);
        submission.created_at = Some(Utc::now());

        submission.id = self
            .ctx
            .store()
            .create(Collection::Submissions, SubmissionInsert::new(&submission).into_fields())
            .await?;

        info!(
            submission_id = %submission.id,
            campaign_id = %submission.campaign_id,
            "Content submitted"
        );

        Ok(SubmissionResponse::from(&submission))
    }

    /// Get submission entity by ID
    #[instrument(skip(self))]
    pub async fn get_submission(&self, submission_id: &RecordId) -> ServiceResult<Submission> {
        let doc = self
            .ctx
            .store()
            .read(Collection::Submissions, submission_id)
            .await?
            .ok_or_else(|| DomainError::SubmissionNotFound(submission_id.clone()))?;

        Ok(Submission::from_document(&doc))
    }

    /// Set the review status. Only the restaurant running the campaign (or
    /// an admin) may review.
    #[instrument(skip(self, actor, request), fields(actor = %actor.user_id, status = %request.status))]
    pub async fn update_submission_status(
        &self,
        actor: &Actor,
        submission_id: &RecordId,
        request: UpdateStatusRequest,
    ) -> ServiceResult<SubmissionResponse> {
        request.validate()?;
        let status = SubmissionStatus::parse(&request.status);
        actor.require_role(&[UserRole::Restaurant], "review submissions")?;

        let mut submission = self.get_submission(submission_id).await?;
        if !actor.is_admin() {
            let owner = self.campaign_owner(&submission).await?;
            if owner.as_ref() != Some(&actor.user_id) {
                return Err(DomainError::NotCampaignOwner.into());
            }
        }

        self.ctx
            .store()
            .update(Collection::Submissions, submission_id, status_patch(&status))
            .await?;
        submission.status = status;

        info!(submission_id = %submission_id, status = %submission.status, "Submission status updated");

        Ok(SubmissionResponse::from(&submission))
    }

    /// Write the tracked counts for a submission. The metrics record is
    /// keyed by the submission id and carries a recomputed engagement rate.
    #[instrument(skip(self, actor, request), fields(actor = %actor.user_id))]
    pub async fn update_metrics(
        &self,
        actor: &Actor,
        submission_id: &RecordId,
        request: UpdateMetricsRequest,
    ) -> ServiceResult<MetricsResponse> {
        request.validate()?;
        let views = u64::try_from(request.views)
            .map_err(|_| DomainError::NegativeValue { field: "views" })?;
        let likes = u64::try_from(request.likes)
            .map_err(|_| DomainError::NegativeValue { field: "likes" })?;
        actor.require_role(&[], "update metrics")?;

        self.get_submission(submission_id).await?;

        let upsert = MetricsUpsert {
            submission_id: submission_id.as_str(),
            views,
            likes,
            engagement_rate: engagement_rate(views, likes),
            updated_at: Utc::now(),
        };
        let response = MetricsResponse::from(&upsert);
        self.ctx
            .store()
            .set(Collection::Metrics, submission_id, upsert.into_fields())
            .await?;

        info!(submission_id = %submission_id, views, likes, "Metrics updated");

        Ok(response)
    }

    /// Delete a submission together with its metrics record
    #[instrument(skip(self, actor), fields(actor = %actor.user_id))]
    pub async fn delete_submission(
        &self,
        actor: &Actor,
        submission_id: &RecordId,
    ) -> ServiceResult<()> {
        let submission = self.get_submission(submission_id).await?;
        actor.require_submitter(&submission)?;

        self.ctx
            .store()
            .delete(Collection::Submissions, submission_id)
            .await?;
        self.ctx
            .store()
            .delete(Collection::Metrics, submission_id)
            .await?;

        info!(submission_id = %submission_id, "Submission deleted");

        Ok(())
    }

    /// Restaurant responsible for a submission. Older records lack the
    /// denormalized id; those fall back to the campaign.
    async fn campaign_owner(&self, submission: &Submission) -> ServiceResult<Option<RecordId>> {
        if let Some(owner) = &submission.restaurant_id {
            return Ok(Some(owner.clone()));
        }

        debug!(campaign_id = %submission.campaign_id, "Resolving owner through campaign");
        match CampaignService::new(self.ctx)
            .get_campaign(&submission.campaign_id)
            .await
        {
            Ok(campaign) => Ok(Some(campaign.restaurant_id)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
