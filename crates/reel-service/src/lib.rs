//! # reel-service
//!
//! Application layer containing live queries, the role-scoped aggregator,
//! dashboards, mutation services, and DTOs.

pub mod aggregate;
pub mod dashboard;
pub mod dto;
pub mod live;
pub mod services;

pub use aggregate::{
    Aggregate, Aggregator, CampaignSummary, Counts, EnrichedSubmission, OpenCampaign, Rollups,
};
pub use dashboard::{Dashboard, DashboardView, Scope, SubmissionFilter};
pub use live::{QueryPhase, SubscriptionManager};
pub use services::{
    Actor, CampaignService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SubmissionService,
};
