//! Role-scoped aggregation
//!
//! Pure derivation from decoded snapshots to the numbers a dashboard shows.
//! Nothing here writes to the store or keeps state between derivations.

mod aggregator;
mod lookups;
mod view;

pub use aggregator::{Aggregator, Inputs};
pub use lookups::Lookups;
pub use view::{Aggregate, CampaignSummary, Counts, EnrichedSubmission, OpenCampaign, Rollups};
