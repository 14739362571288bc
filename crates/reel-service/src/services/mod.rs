//! Mutation services
//!
//! Writes go straight to the record store. Dashboards observe the results
//! through their own subscriptions; nothing here touches a derived view.

pub mod access;
pub mod campaign;
pub mod context;
pub mod error;
pub mod submission;

pub use access::Actor;
pub use campaign::CampaignService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use submission::SubmissionService;
