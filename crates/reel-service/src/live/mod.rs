//! Live queries
//!
//! Keeps one store subscription per named slot and replaces it only when
//! the slot's normalized query actually changes.

mod manager;
mod query;

pub use manager::SubscriptionManager;
pub use query::QueryPhase;
