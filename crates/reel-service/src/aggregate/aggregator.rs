//! Aggregator - joins submissions with campaigns, metrics and users

use std::collections::{BTreeMap, BTreeSet};

use reel_core::{calculator, Campaign, Metrics, RecordId, Submission, User};
use rust_decimal::Decimal;

use super::lookups::Lookups;
use super::view::{
    Aggregate, CampaignSummary, Counts, EnrichedSubmission, OpenCampaign, Rollups,
};
use crate::dashboard::Scope;

/// Decoded snapshots of the four collections
#[derive(Debug, Clone, Copy, Default)]
pub struct Inputs<'a> {
    pub campaigns: &'a [Campaign],
    pub submissions: &'a [Submission],
    pub metrics: &'a [Metrics],
    pub users: &'a [User],
}

/// Derives a scope's view from decoded snapshots
pub struct Aggregator<'a> {
    scope: &'a Scope,
    unresolved_label: &'a str,
}

impl<'a> Aggregator<'a> {
    pub fn new(scope: &'a Scope, unresolved_label: &'a str) -> Self {
        Self {
            scope,
            unresolved_label,
        }
    }

    pub fn aggregate(&self, inputs: Inputs<'_>) -> Aggregate {
        let lookups = Lookups::build(inputs.campaigns, inputs.users, inputs.metrics);

        let owned: Vec<&Campaign> = inputs
            .campaigns
            .iter()
            .filter(|c| self.scope.owns_campaign(c))
            .collect();
        let owned_ids: BTreeSet<&RecordId> = owned.iter().map(|c| &c.id).collect();

        let submissions: Vec<EnrichedSubmission> = inputs
            .submissions
            .iter()
            .filter(|s| self.scope.sees_submission(s, &owned_ids))
            .map(|s| self.enrich(s, &lookups))
            .collect();

        let rollups: Rollups = submissions.iter().collect();

        let campaigns = owned
            .iter()
            .map(|c| summarize(c, &submissions))
            .collect();

        let open_campaigns = match self.scope {
            Scope::Influencer(_) => open_campaigns(inputs.campaigns, &submissions),
            _ => Vec::new(),
        };

        let visible: Vec<&Campaign> = match self.scope {
            Scope::Restaurant(_) => owned.clone(),
            Scope::Anonymous => Vec::new(),
            Scope::Influencer(_) | Scope::Admin => inputs.campaigns.iter().collect(),
        };

        let counts = Counts {
            users: inputs.users.len(),
            campaigns: visible.len(),
            active_campaigns: visible.iter().filter(|c| c.active).count(),
            submissions: submissions.len(),
        };

        Aggregate {
            submissions,
            rollups,
            campaigns,
            open_campaigns,
            counts,
        }
    }

    /// Resolve every derived number for one submission
    pub fn enrich(&self, submission: &Submission, lookups: &Lookups<'_>) -> EnrichedSubmission {
        let campaign = lookups.campaign(&submission.campaign_id);
        let reward_rate = campaign.map_or(Decimal::ZERO, |c| c.reward_rate);
        let resolution = calculator::resolve(
            submission,
            lookups.metrics(&submission.id),
            reward_rate,
        );

        let campaign_title = campaign
            .map(|c| c.title.trim())
            .filter(|title| !title.is_empty())
            .unwrap_or(self.unresolved_label)
            .to_string();

        let influencer_name = lookups
            .user(&submission.influencer_id)
            .map_or_else(|| submission.influencer_id.to_string(), User::label);

        EnrichedSubmission {
            id: submission.id.clone(),
            campaign_id: submission.campaign_id.clone(),
            campaign_title,
            campaign_resolved: campaign.is_some(),
            influencer_id: submission.influencer_id.clone(),
            influencer_name,
            restaurant_id: submission
                .restaurant_id
                .clone()
                .or_else(|| campaign.map(|c| c.restaurant_id.clone())),
            status: submission.status.clone(),
            content_url: submission.content_url.clone(),
            content_domain: submission.content_domain(),
            views: resolution.views,
            likes: resolution.likes,
            earnings: resolution.earnings,
            reward_rate,
            engagement_rate: resolution.engagement_rate,
            created_at: submission.created_at,
        }
    }
}

fn summarize(campaign: &Campaign, submissions: &[EnrichedSubmission]) -> CampaignSummary {
    let mine: Vec<&EnrichedSubmission> = submissions
        .iter()
        .filter(|s| s.campaign_id == campaign.id)
        .collect();
    let rollups: Rollups = mine.iter().copied().collect();
    let spent = rollups.earnings;

    let influencers_over_cap = match campaign.payout_cap {
        Some(cap) => {
            let mut per_influencer: BTreeMap<&RecordId, Decimal> = BTreeMap::new();
            for s in &mine {
                let total = per_influencer.entry(&s.influencer_id).or_default();
                *total = total.saturating_add(s.earnings.value);
            }
            per_influencer
                .into_iter()
                .filter(|(_, earned)| *earned > cap)
                .map(|(id, _)| id.clone())
                .collect()
        }
        None => Vec::new(),
    };

    CampaignSummary {
        campaign_id: campaign.id.clone(),
        title: campaign.title.clone(),
        active: campaign.active,
        reward_rate: campaign.reward_rate,
        rollups,
        budget: campaign.budget,
        budget_remaining: campaign.remaining_budget(spent),
        over_budget: campaign.is_over_budget(spent),
        payout_cap: campaign.payout_cap,
        influencers_over_cap,
    }
}

fn open_campaigns(campaigns: &[Campaign], mine: &[EnrichedSubmission]) -> Vec<OpenCampaign> {
    let applied: BTreeSet<&RecordId> = mine.iter().map(|s| &s.campaign_id).collect();
    campaigns
        .iter()
        .filter(|c| c.active)
        .map(|c| OpenCampaign {
            id: c.id.clone(),
            restaurant_id: c.restaurant_id.clone(),
            title: c.title.clone(),
            description: c.description.clone(),
            reward_rate: c.reward_rate,
            applied: applied.contains(&c.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::{Source, SubmissionStatus, UserRole};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn campaign(id: &str, owner: &str, rate: &str) -> Campaign {
        Campaign::new(RecordId::new(id), RecordId::new(owner), format!("{id} title"), dec(rate))
    }

    fn submission(id: &str, influencer: &str, campaign: &str, views: u64) -> Submission {
        let mut s = Submission::new(RecordId::new(id), RecordId::new(influencer), RecordId::new(campaign));
        s.views = Some(views);
        s
    }

    #[test]
    fn test_enriches_with_campaign_rate() {
        let campaigns = [campaign("c1", "r1", "5")];
        let submissions = [submission("s1", "i1", "c1", 2000)];
        let scope = Scope::Influencer(RecordId::new("i1"));

        let agg = Aggregator::new(&scope, "Campaign").aggregate(Inputs {
            campaigns: &campaigns,
            submissions: &submissions,
            ..Inputs::default()
        });

        let s = &agg.submissions[0];
        assert_eq!(s.campaign_title, "c1 title");
        assert_eq!(s.earnings.value, dec("10.00"));
        assert_eq!(s.earnings.source, Source::Computed);
        assert_eq!(s.influencer_name, "i1");
        assert_eq!(s.restaurant_id, Some(RecordId::new("r1")));
        assert_eq!(agg.rollups.earnings, dec("10.00"));
    }

    #[test]
    fn test_unresolved_campaign_degrades() {
        let mut overridden = submission("s2", "i1", "gone", 5000);
        overridden.earnings = Some(dec("3.50"));
        let submissions = [submission("s1", "i1", "gone", 5000), overridden];
        let scope = Scope::Admin;

        let agg = Aggregator::new(&scope, "Campaign").aggregate(Inputs {
            submissions: &submissions,
            ..Inputs::default()
        });

        assert_eq!(agg.submissions[0].campaign_title, "Campaign");
        assert!(!agg.submissions[0].campaign_resolved);
        assert_eq!(agg.submissions[0].earnings.value, Decimal::ZERO);
        assert_eq!(agg.submissions[1].earnings.value, dec("3.50"));
        assert_eq!(agg.submissions[1].earnings.source, Source::Override);
    }

    #[test]
    fn test_rollups_count_active_statuses() {
        let mut subs: Vec<Submission> = ["pending", "submitted", "joined", "approved", "rejected"]
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let mut s = submission(&format!("s{i}"), "i1", "c1", 100);
                s.status = SubmissionStatus::parse(status);
                s.likes = Some(1);
                s
            })
            .collect();
        subs.sort_by(|a, b| a.id.cmp(&b.id));
        let scope = Scope::Admin;

        let agg = Aggregator::new(&scope, "Campaign").aggregate(Inputs {
            submissions: &subs,
            ..Inputs::default()
        });

        assert_eq!(agg.rollups.count, 4);
        assert_eq!(agg.rollups.total, 5);
        assert_eq!(agg.rollups.views, 500);
        assert_eq!(agg.rollups.likes, 5);
    }

    #[test]
    fn test_restaurants_are_isolated() {
        let campaigns = [campaign("c1", "r1", "1"), campaign("c2", "r2", "1")];
        let submissions = [
            submission("s1", "i1", "c1", 1000),
            submission("s2", "i1", "c2", 3000),
        ];
        let inputs = Inputs {
            campaigns: &campaigns,
            submissions: &submissions,
            ..Inputs::default()
        };

        let r1 = Scope::Restaurant(RecordId::new("r1"));
        let agg = Aggregator::new(&r1, "Campaign").aggregate(inputs);
        assert_eq!(agg.rollups.total, 1);
        assert_eq!(agg.rollups.views, 1000);
        assert_eq!(agg.campaigns.len(), 1);
        assert_eq!(agg.counts.campaigns, 1);

        let r2 = Scope::Restaurant(RecordId::new("r2"));
        let agg = Aggregator::new(&r2, "Campaign").aggregate(inputs);
        assert_eq!(agg.rollups.views, 3000);
    }

    #[test]
    fn test_campaign_summary_budget_and_cap() {
        let mut c = campaign("c1", "r1", "10");
        c.budget = Some(dec("25"));
        c.payout_cap = Some(dec("15"));
        let campaigns = [c];
        let submissions = [
            submission("s1", "i1", "c1", 1000),
            submission("s2", "i1", "c1", 1000),
            submission("s3", "i2", "c1", 1000),
        ];
        let scope = Scope::Restaurant(RecordId::new("r1"));

        let agg = Aggregator::new(&scope, "Campaign").aggregate(Inputs {
            campaigns: &campaigns,
            submissions: &submissions,
            ..Inputs::default()
        });

        let summary = &agg.campaigns[0];
        assert_eq!(summary.rollups.earnings, dec("30"));
        assert_eq!(summary.budget_remaining, Some(Decimal::ZERO));
        assert!(summary.over_budget);
        assert_eq!(summary.influencers_over_cap, vec![RecordId::new("i1")]);
    }

    #[test]
    fn test_open_campaigns_for_influencer() {
        let mut closed = campaign("c2", "r1", "1");
        closed.active = false;
        let campaigns = [campaign("c1", "r1", "1"), closed, campaign("c3", "r2", "2")];
        let submissions = [submission("s1", "i1", "c1", 0)];
        let scope = Scope::Influencer(RecordId::new("i1"));

        let agg = Aggregator::new(&scope, "Campaign").aggregate(Inputs {
            campaigns: &campaigns,
            submissions: &submissions,
            ..Inputs::default()
        });

        let open: Vec<(&str, bool)> = agg
            .open_campaigns
            .iter()
            .map(|c| (c.id.as_str(), c.applied))
            .collect();
        assert_eq!(open, [("c1", true), ("c3", false)]);
        assert_eq!(agg.counts.active_campaigns, 2);
        assert!(agg.campaigns.is_empty());
    }

    #[test]
    fn test_metrics_and_user_labels() {
        let campaigns = [campaign("c1", "r1", "5")];
        let submissions = [submission("s1", "i1", "c1", 100)];
        let metrics = [Metrics::new(RecordId::new("s1"), Some(3000), Some(30))];
        let mut user = User::new(RecordId::new("i1"), UserRole::Influencer);
        user.username = Some("foodie".into());
        let users = [user];
        let scope = Scope::Admin;

        let agg = Aggregator::new(&scope, "Campaign").aggregate(Inputs {
            campaigns: &campaigns,
            submissions: &submissions,
            metrics: &metrics,
            users: &users,
        });

        let s = &agg.submissions[0];
        assert_eq!(s.views.value, 3000);
        assert_eq!(s.views.source, Source::Metrics);
        assert_eq!(s.earnings.value, dec("15.00"));
        assert_eq!(s.engagement_rate, dec("1.00"));
        assert_eq!(s.influencer_name, "foodie");
        assert_eq!(agg.counts.users, 1);
    }

    #[test]
    fn test_anonymous_is_empty() {
        let campaigns = [campaign("c1", "r1", "5")];
        let submissions = [submission("s1", "i1", "c1", 100)];
        let scope = Scope::Anonymous;

        let agg = Aggregator::new(&scope, "Campaign").aggregate(Inputs {
            campaigns: &campaigns,
            submissions: &submissions,
            ..Inputs::default()
        });
        assert!(agg.submissions.is_empty());
        assert_eq!(agg.rollups, Rollups::default());
        assert_eq!(agg.counts.campaigns, 0);
    }
}
