//! Domain entities - typed views of store records

mod campaign;
mod metrics;
mod submission;
mod user;

pub use campaign::Campaign;
pub use metrics::Metrics;
pub use submission::{Submission, SubmissionStatus};
pub use user::{User, UserRole};
