//! Store trait (port) - the contract every record store adapter implements

mod store;

pub use store::{ErrorCallback, RecordStore, Snapshot, SnapshotCallback, StoreResult, Subscription};
