//! Dashboard Integration Tests
//!
//! End-to-end scenarios: records written to an in-memory store flow through
//! live subscriptions into each role's derived view.
//!
//! Run with: cargo test -p integration-tests --test dashboard_tests

use integration_tests::{fixtures::*, next_view, TestWorld};
use reel_core::{Collection, RecordId, Source, StoreError, SubmissionStatus};
use reel_service::dto::{SubmitContentRequest, UpdateMetricsRequest, UpdateStatusRequest};
use reel_service::{Actor, CampaignService, Dashboard, SubmissionFilter, SubmissionService};
use rust_decimal::Decimal;
use serde_json::json;

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Submission id, views, likes, earnings
type Row = (RecordId, u64, u64, Decimal);

/// Per-submission resolved numbers, ordered by id, plus total earnings
fn resolved_rows(dash: &mut Dashboard) -> (Vec<Row>, Decimal) {
    let view = dash.view();
    let mut rows: Vec<Row> = view
        .submissions
        .iter()
        .map(|s| (s.id.clone(), s.views.value, s.likes.value, s.earnings.value))
        .collect();
    rows.sort();
    (rows, view.rollups.earnings)
}

// ============================================================================
// Derived numbers
// ============================================================================

#[tokio::test]
async fn test_earnings_follow_metrics_without_recompute() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(5))).await.unwrap();
    world
        .put(Collection::Submissions, "s1", submission_with_views("c1", "i1", 2000))
        .await
        .unwrap();

    let mut dash = world.restaurant("r1");
    let view = dash.view();
    assert_eq!(view.submissions[0].views.value, 2000);
    assert_eq!(view.submissions[0].views.source, Source::Submission);
    assert_eq!(view.rollups.earnings, money(1000));

    world.put(Collection::Metrics, "s1", metrics("s1", 3000, 60)).await.unwrap();

    let view = next_view(&mut dash).await.unwrap();
    let s1 = &view.submissions[0];
    assert_eq!(s1.views.value, 3000);
    assert_eq!(s1.views.source, Source::Metrics);
    assert_eq!(s1.earnings.value, money(1500));
    assert_eq!(s1.earnings.source, Source::Computed);
    assert_eq!(s1.engagement_rate, money(200));
}

#[tokio::test]
async fn test_stored_earnings_override_computed() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(5))).await.unwrap();
    let mut overridden = submission_with_views("c1", "i1", 1800);
    overridden.insert("earnings".into(), json!("12.50"));
    world.put(Collection::Submissions, "s1", overridden).await.unwrap();
    world
        .put(Collection::Submissions, "s2", submission_with_views("c1", "i2", 1800))
        .await
        .unwrap();

    let view = world.admin().view();
    let by_id = |id: &str| {
        view.submissions
            .iter()
            .find(|s| s.id.as_str() == id)
            .unwrap()
            .clone()
    };

    assert_eq!(by_id("s1").earnings.value, money(1250));
    assert_eq!(by_id("s1").earnings.source, Source::Override);
    assert_eq!(by_id("s2").earnings.value, money(900));
    assert_eq!(view.rollups.earnings, money(2150));
}

#[tokio::test]
async fn test_view_fallback_chain() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(1))).await.unwrap();
    world
        .put(Collection::Submissions, "with-metrics", submission_with_views("c1", "i1", 100))
        .await
        .unwrap();
    world
        .put(Collection::Submissions, "own-views", submission_with_views("c1", "i1", 100))
        .await
        .unwrap();
    world
        .put(Collection::Submissions, "nothing", submission("c1", "i1"))
        .await
        .unwrap();
    world
        .put(Collection::Metrics, "with-metrics", metrics("with-metrics", 500, 5))
        .await
        .unwrap();

    let view = world.influencer("i1").view();
    let views: Vec<(&str, u64)> = view
        .submissions
        .iter()
        .map(|s| (s.id.as_str(), s.views.value))
        .collect();

    assert_eq!(views, [("nothing", 0), ("own-views", 100), ("with-metrics", 500)]);
    assert_eq!(view.rollups.views, 600);
}

// ============================================================================
// Scoping
// ============================================================================

#[tokio::test]
async fn test_restaurants_never_see_each_other() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(5))).await.unwrap();
    world.put(Collection::Campaigns, "c2", campaign("r2", "Noodle", json!(5))).await.unwrap();
    world
        .put(Collection::Submissions, "s1", submission_with_views("c1", "i1", 1000))
        .await
        .unwrap();
    world
        .put(Collection::Submissions, "s2", submission_with_views("c2", "i1", 4000))
        .await
        .unwrap();

    let r1 = world.restaurant("r1").view();
    let r2 = world.restaurant("r2").view();

    assert_eq!(r1.rollups.total, 1);
    assert_eq!(r1.rollups.views, 1000);
    assert!(r1.submissions.iter().all(|s| s.campaign_id.as_str() == "c1"));
    assert_eq!(r2.rollups.total, 1);
    assert_eq!(r2.rollups.views, 4000);
    assert_eq!(r1.campaigns.len(), 1);
    assert_eq!(r1.counts.campaigns, 1);
}

#[tokio::test]
async fn test_roles_agree_on_resolved_numbers() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(5))).await.unwrap();
    world
        .put(Collection::Submissions, "s1", submission_with_views("c1", "i1", 2000))
        .await
        .unwrap();
    world
        .put(Collection::Submissions, "s2", submission_with_views("c1", "i1", 500))
        .await
        .unwrap();
    world.put(Collection::Metrics, "m1", metrics("s1", 4000, 80)).await.unwrap();
    world.put(Collection::Metrics, "s2", keyed_metrics(3000, 10)).await.unwrap();

    let mut dashboards = [world.admin(), world.restaurant("r1"), world.influencer("i1")];

    let expected: (Vec<Row>, Decimal) = (
        vec![
            (RecordId::new("s1"), 4000, 80, money(2000)),
            (RecordId::new("s2"), 3000, 10, money(1500)),
        ],
        money(3500),
    );
    for dash in &mut dashboards {
        assert_eq!(resolved_rows(dash), expected, "{}", dash.scope());
    }

    world.put(Collection::Metrics, "s1", keyed_metrics(6000, 5)).await.unwrap();
    world.remove(Collection::Metrics, "m1").await.unwrap();
    let row: Row = (RecordId::new("s1"), 6000, 5, money(3000));
    for dash in &mut dashboards {
        let (rows, _) = resolved_rows(dash);
        assert_eq!(rows[0], row, "{}", dash.scope());
    }
}

#[tokio::test]
async fn test_restaurant_without_campaigns_issues_no_submission_query() {
    let world = TestWorld::new();
    world
        .put(Collection::Submissions, "s1", submission_with_views("c1", "i1", 1000))
        .await
        .unwrap();

    let view = world.restaurant("r1").view();

    assert!(view.submissions.is_empty());
    assert_eq!(view.rollups, Default::default());
    assert!(!view.loading);
    assert!(view.error.is_none());
    assert_eq!(world.store.query_count(Collection::Submissions), 0);
    assert_eq!(world.store.query_count(Collection::Metrics), 0);
}

#[tokio::test]
async fn test_restaurant_picks_up_new_campaign() {
    let world = TestWorld::new();
    world
        .put(Collection::Submissions, "s1", submission_with_views("c1", "i1", 1000))
        .await
        .unwrap();
    let mut dash = world.restaurant("r1");
    assert!(dash.view().submissions.is_empty());

    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(2))).await.unwrap();

    let view = next_view(&mut dash).await.unwrap();
    assert_eq!(view.submissions.len(), 1);
    assert_eq!(view.rollups.earnings, money(200));
}

#[tokio::test]
async fn test_influencer_names_resolve_from_users() {
    let world = TestWorld::new();
    world.put(Collection::Users, "i1", user("influencer", "Chef Kim")).await.unwrap();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(1))).await.unwrap();
    world.put(Collection::Submissions, "s1", submission("c1", "i1")).await.unwrap();
    world.put(Collection::Submissions, "s2", submission("c1", "i2")).await.unwrap();

    let view = world.restaurant("r1").view();
    let names: Vec<&str> = view.submissions.iter().map(|s| s.influencer_name.as_str()).collect();
    assert_eq!(names, ["Chef Kim", "i2"]);
    assert_eq!(view.counts.users, 1);
}

// ============================================================================
// Degradation
// ============================================================================

#[tokio::test]
async fn test_deleted_campaign_degrades_to_placeholder() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(5))).await.unwrap();
    world
        .put(Collection::Submissions, "s1", submission_with_views("c1", "i1", 2000))
        .await
        .unwrap();
    let mut overridden = submission_with_views("c1", "i1", 2000);
    overridden.insert("earnings".into(), json!(7));
    world.put(Collection::Submissions, "s2", overridden).await.unwrap();

    let mut dash = world.influencer("i1");
    assert_eq!(dash.view().rollups.earnings, money(1700));

    world.remove(Collection::Campaigns, "c1").await.unwrap();
    let view = next_view(&mut dash).await.unwrap();

    assert!(view.error.is_none());
    assert!(view.submissions.iter().all(|s| s.campaign_title == "Campaign"));
    assert!(view.submissions.iter().all(|s| !s.campaign_resolved));
    assert_eq!(view.submissions[0].earnings.value, Decimal::ZERO);
    assert_eq!(view.submissions[1].earnings.value, money(700));
}

#[tokio::test]
async fn test_failing_collection_keeps_sibling_data() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(5))).await.unwrap();
    world
        .put(Collection::Submissions, "s1", submission_with_views("c1", "i1", 2000))
        .await
        .unwrap();
    let mut dash = world.admin();
    assert!(dash.view().error.is_none());

    world
        .store
        .fail_collection(Collection::Metrics, StoreError::PermissionDenied(Collection::Metrics));
    let view = next_view(&mut dash).await.unwrap();

    assert!(view.error.as_deref().is_some_and(|e| e.starts_with("metrics")));
    assert_eq!(view.submissions.len(), 1);
    assert_eq!(view.rollups.earnings, money(1000));
    assert!(!view.loading);

    world.store.restore_collection(Collection::Metrics);
    dash.retry();
    assert!(dash.view().error.is_none());
}

// ============================================================================
// Mutations observed through dashboards
// ============================================================================

#[tokio::test]
async fn test_review_flow() {
    let world = TestWorld::new();
    let restaurant = Actor::restaurant("r1");
    let influencer = Actor::influencer("i1");

    let created = CampaignService::new(&world.ctx)
        .create_campaign(
            &restaurant,
            serde_json::from_value(json!({"title": "Taco Tuesday", "reward_rate": "5"})).unwrap(),
        )
        .await
        .unwrap();

    let mut restaurant_dash = world.restaurant("r1");
    let mut influencer_dash = world.influencer("i1");
    let open = influencer_dash.view().open_campaigns;
    assert_eq!(open.len(), 1);
    assert!(!open[0].applied);

    let submissions = SubmissionService::new(&world.ctx);
    let submitted = submissions
        .submit_content(
            &influencer,
            SubmitContentRequest {
                campaign_id: created.id.to_string(),
                content_url: "https://www.tiktok.com/@eats/video/7".to_string(),
            },
        )
        .await
        .unwrap();

    let view = next_view(&mut influencer_dash).await.unwrap();
    assert!(view.open_campaigns[0].applied);
    assert_eq!(view.submissions[0].content_domain.as_deref(), Some("tiktok.com"));

    submissions
        .update_submission_status(&restaurant, &submitted.id, UpdateStatusRequest::new("approved"))
        .await
        .unwrap();
    submissions
        .update_metrics(
            &Actor::admin("a1"),
            &submitted.id,
            UpdateMetricsRequest { views: 2000, likes: 40 },
        )
        .await
        .unwrap();

    let view = next_view(&mut restaurant_dash).await.unwrap();
    assert_eq!(view.submissions[0].status, SubmissionStatus::Approved);
    assert_eq!(view.rollups.earnings, money(1000));
    assert_eq!(view.campaigns[0].rollups.views, 2000);

    let approved = restaurant_dash.filtered(
        &SubmissionFilter::default()
            .campaign(created.id.clone())
            .status(SubmissionStatus::Approved),
    );
    assert_eq!(approved.len(), 1);

    CampaignService::new(&world.ctx)
        .toggle_campaign_active(&restaurant, &created.id)
        .await
        .unwrap();
    let view = next_view(&mut influencer_dash).await.unwrap();
    assert!(view.open_campaigns.is_empty());
    assert_eq!(view.submissions.len(), 1);
}

#[tokio::test]
async fn test_rejected_mutations_leave_views_alone() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(5))).await.unwrap();
    world.put(Collection::Submissions, "s1", submission("c1", "i1")).await.unwrap();
    let mut dash = world.admin();
    let before = dash.view();

    let submissions = SubmissionService::new(&world.ctx);
    let s1 = RecordId::new("s1");
    assert!(submissions
        .update_metrics(&Actor::admin("a1"), &s1, UpdateMetricsRequest { views: -1, likes: 0 })
        .await
        .is_err());
    assert!(submissions
        .update_submission_status(&Actor::restaurant("r2"), &s1, UpdateStatusRequest::new("approved"))
        .await
        .is_err());
    assert!(CampaignService::new(&world.ctx)
        .delete_campaign(&Actor::restaurant("r2"), &RecordId::new("c1"))
        .await
        .is_err());

    assert_eq!(dash.view(), before);
}

#[tokio::test]
async fn test_admin_counts_and_budgets() {
    let world = TestWorld::new();
    world.put(Collection::Users, "r1", user("restaurant", "Taco Shop")).await.unwrap();
    world.put(Collection::Users, "i1", user("influencer", "Eats")).await.unwrap();
    let mut limited = campaign("r1", "Taco", json!(10));
    limited.insert("budget".into(), json!("25"));
    limited.insert("payout_cap".into(), json!("15"));
    world.put(Collection::Campaigns, "c1", limited).await.unwrap();
    let mut closed = campaign("r1", "Winter", json!(1));
    closed.insert("active_status".into(), json!(false));
    world.put(Collection::Campaigns, "c2", closed).await.unwrap();
    world
        .put(Collection::Submissions, "s1", submission_with_views("c1", "i1", 2000))
        .await
        .unwrap();
    world
        .put(Collection::Submissions, "s2", submission_with_views("c1", "i2", 1000))
        .await
        .unwrap();

    let view = world.admin().view();

    assert_eq!(view.counts.users, 2);
    assert_eq!(view.counts.campaigns, 2);
    assert_eq!(view.counts.active_campaigns, 1);
    assert_eq!(view.counts.submissions, 2);

    let c1 = view
        .campaigns
        .iter()
        .find(|c| c.campaign_id.as_str() == "c1")
        .unwrap();
    assert_eq!(c1.rollups.earnings, money(3000));
    assert_eq!(c1.budget_remaining, Some(Decimal::ZERO));
    assert!(c1.over_budget);
    assert_eq!(c1.influencers_over_cap, [RecordId::new("i1")]);
}

#[tokio::test]
async fn test_dropping_dashboards_releases_listeners() {
    let world = TestWorld::new();
    world.put(Collection::Campaigns, "c1", campaign("r1", "Taco", json!(5))).await.unwrap();
    world.put(Collection::Submissions, "s1", submission("c1", "i1")).await.unwrap();

    {
        let mut restaurant = world.restaurant("r1");
        let mut admin = world.admin();
        restaurant.view();
        admin.view();
        assert_eq!(world.store.listener_count(Collection::Submissions), 2);
    }

    for collection in Collection::ALL {
        assert_eq!(world.store.listener_count(collection), 0);
    }
}
