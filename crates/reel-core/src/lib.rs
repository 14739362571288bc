//! # reel-core
//!
//! Domain layer containing the record types, the filter predicate language, the
//! record store contract, store change events, and the earnings calculator.
//! This crate has zero dependencies on infrastructure (store backends, runtime, etc.).

pub mod calculator;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use calculator::{
    compute_earnings, engagement_rate, resolve, resolve_earnings, resolve_views_and_likes,
    round2, Resolution, Resolved, ResolvedCounts, Source,
};
pub use entities::{Campaign, Metrics, Submission, SubmissionStatus, User, UserRole};
pub use error::{DomainError, StoreError};
pub use events::{ChangeKind, StoreChange};
pub use traits::{
    ErrorCallback, RecordStore, Snapshot, SnapshotCallback, StoreResult, Subscription,
};
pub use value_objects::{
    Clause, Collection, Document, Fields, Filter, FilterValue, QueryKey, RecordId, DOCUMENT_ID,
};
