//! Store change events

mod store_change;

pub use store_change::{ChangeKind, StoreChange};
