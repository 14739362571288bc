//! Role-scoped live dashboards

mod dashboard;
mod scope;

pub use dashboard::{Dashboard, DashboardView, SubmissionFilter};
pub use scope::Scope;
