//! Live listener registry
//!
//! Uses `DashMap` so subscribe/unsubscribe never contend with each other.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use reel_core::{
    Collection, ErrorCallback, Filter, Snapshot, SnapshotCallback, StoreError, Subscription,
};

/// One open subscription
pub(crate) struct Listener {
    pub id: u64,
    pub collection: Collection,
    pub filter: Filter,
    on_snapshot: SnapshotCallback,
    on_error: ErrorCallback,
    open: AtomicBool,
}

impl Listener {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn deliver(&self, snapshot: Snapshot) {
        if self.is_open() {
            tracing::trace!(
                listener = self.id,
                collection = %self.collection,
                documents = snapshot.len(),
                "Delivering snapshot"
            );
            (self.on_snapshot)(snapshot);
        }
    }

    pub fn fail(&self, error: StoreError) {
        if self.is_open() {
            tracing::warn!(
                listener = self.id,
                collection = %self.collection,
                error = %error,
                "Delivering subscription error"
            );
            (self.on_error)(error);
        }
    }
}

/// All open listeners by id
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: DashMap<u64, Arc<Listener>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    pub fn register(
        self: &Arc<Self>,
        collection: Collection,
        filter: Filter,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> (Arc<Listener>, Subscription) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let listener = Arc::new(Listener {
            id,
            collection,
            filter,
            on_snapshot,
            on_error,
            open: AtomicBool::new(true),
        });
        self.listeners.insert(id, listener.clone());

        tracing::debug!(listener = id, collection = %collection, "Listener added");

        let registry: Weak<Self> = Arc::downgrade(self);
        let subscription = Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        });

        (listener, subscription)
    }

    pub fn remove(&self, id: u64) {
        if let Some((_, listener)) = self.listeners.remove(&id) {
            listener.open.store(false, Ordering::Release);
            tracing::debug!(
                listener = id,
                collection = %listener.collection,
                "Listener removed"
            );
        }
    }

    /// Open listeners on a collection. Clones the handles so no shard lock
    /// is held while callbacks run.
    pub fn for_collection(&self, collection: Collection) -> Vec<Arc<Listener>> {
        let mut found: Vec<Arc<Listener>> = self
            .listeners
            .iter()
            .filter(|entry| entry.collection == collection)
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|l| l.id);
        found
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.listeners
            .iter()
            .filter(|entry| entry.collection == collection)
            .count()
    }
}
