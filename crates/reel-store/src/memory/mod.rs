//! In-process record store
//!
//! Implements the full store contract over process memory with synchronous
//! change delivery. Used by the console runner and by tests, which can also
//! inject failures and inspect how many queries were issued.

mod listeners;
mod seed;
mod store;

pub use seed::{SeedData, SeedError};
pub use store::MemoryStore;
