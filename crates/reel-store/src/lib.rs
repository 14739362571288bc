//! # reel-store
//!
//! Store layer containing the in-process record store and the mappers
//! between untyped documents and domain entities.

pub mod mappers;
pub mod memory;

// Re-export commonly used types at crate root
pub use mappers::{
    active_patch, fields, status_patch, CampaignInsert, FromDocument, MetricsUpsert,
    SubmissionInsert, UserInsert,
};
pub use memory::{MemoryStore, SeedData, SeedError};
