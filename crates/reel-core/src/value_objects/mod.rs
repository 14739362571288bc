//! Value objects - immutable types that represent store-level concepts

mod collection;
mod document;
mod filter;
mod record_id;

pub use collection::Collection;
pub use document::{Document, Fields};
pub use filter::{Clause, Filter, FilterValue, QueryKey, DOCUMENT_ID};
pub use record_id::RecordId;
