//! Record store contract
//!
//! The domain layer defines what it needs from a document store: one-shot
//! reads, writes, and live subscriptions that push a full result set every
//! time it changes. Adapters live in the infrastructure layer.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::value_objects::{Collection, Document, Fields, Filter, RecordId};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Receives each full result set of a live subscription
pub type SnapshotCallback = Arc<dyn Fn(Snapshot) + Send + Sync>;

/// Receives a subscription failure
pub type ErrorCallback = Arc<dyn Fn(StoreError) + Send + Sync>;

/// Full result set of a query at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub collection: Collection,
    pub documents: Vec<Document>,
    pub received_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(collection: Collection, documents: Vec<Document>) -> Self {
        Self {
            collection,
            documents,
            received_at: Utc::now(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Handle to a live subscription.
///
/// Dropping the handle stops delivery. `unsubscribe` may be called any
/// number of times.
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// A handle with nothing to release
    pub fn noop() -> Self {
        Self { dispose: None }
    }

    pub fn unsubscribe(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.dispose.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record in a collection
    async fn read_all(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Records matching a predicate. `Filter::Nothing` yields an empty list
    /// without touching the backend.
    async fn read_filtered(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Vec<Document>>;

    /// A single record by id
    async fn read(&self, collection: Collection, id: &RecordId) -> StoreResult<Option<Document>>;

    /// Insert a record under a generated id
    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<RecordId>;

    /// Merge fields into an existing record. Fails with `NotFound` when
    /// the record does not exist.
    async fn update(&self, collection: Collection, id: &RecordId, fields: Fields)
        -> StoreResult<()>;

    /// Merge fields into a record, creating it when absent
    async fn set(&self, collection: Collection, id: &RecordId, fields: Fields) -> StoreResult<()>;

    /// Remove a record. Removing a missing record is not an error.
    async fn delete(&self, collection: Collection, id: &RecordId) -> StoreResult<()>;

    /// Open a live subscription.
    ///
    /// `on_snapshot` receives the initial result set and then the full set
    /// after every change that affects it. Failures go to `on_error` and do
    /// not close the subscription; only the returned handle does. Rejects
    /// `Filter::Nothing` with `InvalidQuery`.
    fn subscribe(
        &self,
        collection: Collection,
        filter: &Filter,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> StoreResult<Subscription>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut sub = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(sub.is_active());
        sub.unsubscribe();
        sub.unsubscribe();
        drop(sub);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_releases() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        {
            let _sub = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop_subscription() {
        let mut sub = Subscription::noop();
        assert!(!sub.is_active());
        sub.unsubscribe();
    }
}
