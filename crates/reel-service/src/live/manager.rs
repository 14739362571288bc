//! Subscription manager
//!
//! Owns the store subscriptions of one consumer. Each named slot holds at
//! most one live query; requesting the same normalized query again is a
//! no-op, so a logically unchanged predicate never cycles the subscription.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use reel_core::{
    Collection, Document, Filter, QueryKey, RecordStore, Snapshot, StoreError, Subscription,
};
use tokio::sync::watch;
use tracing::{debug, instrument};

use super::query::{bump, Guard, QueryPhase, Revision, SharedSlot, SlotState};

struct Slot {
    collection: Collection,
    filter: Filter,
    state: SharedSlot,
    subscription: Option<Subscription>,
}

/// Keyed set of live queries with a shared change notification
pub struct SubscriptionManager {
    store: Arc<dyn RecordStore>,
    slots: BTreeMap<String, Slot>,
    revision: Revision,
    revision_rx: watch::Receiver<u64>,
}

impl SubscriptionManager {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let (tx, rx) = watch::channel(0);
        Self {
            store,
            slots: BTreeMap::new(),
            revision: Arc::new(tx),
            revision_rx: rx,
        }
    }

    /// Point `slot` at `collection` filtered by `filter`.
    ///
    /// Unchanged queries are left alone unless they have failed, in which
    /// case a fresh subscription is opened. `Filter::Nothing` resolves to an
    /// empty result without contacting the store.
    #[instrument(skip(self, filter), fields(filter = %filter))]
    pub fn request(&mut self, slot: &str, collection: Collection, filter: Filter) {
        let key = QueryKey::new(collection, &filter);

        if let Some(existing) = self.slots.get(slot) {
            let state = existing.state.lock();
            if state.key.as_ref() == Some(&key) && state.phase.error().is_none() {
                return;
            }
        }

        let entry = self.slots.entry(slot.to_string()).or_insert_with(|| Slot {
            collection,
            filter: filter.clone(),
            state: Arc::new(Mutex::new(SlotState::new())),
            subscription: None,
        });
        entry.collection = collection;
        entry.filter = filter;

        Self::open(self.store.as_ref(), &self.revision, entry, key);
    }

    /// Open a fresh subscription for `slot`'s current query
    fn open(store: &dyn RecordStore, revision: &Revision, slot: &mut Slot, key: QueryKey) {
        // Tear the old subscription down before the new one can deliver
        if let Some(mut old) = slot.subscription.take() {
            old.unsubscribe();
        }

        let nothing = slot.filter.is_nothing();
        let generation = {
            let mut state = slot.state.lock();
            state.generation += 1;
            state.key = Some(key.clone());
            state.documents.clear();
            state.phase = if nothing {
                QueryPhase::Active
            } else {
                QueryPhase::Subscribing
            };
            state.generation
        };

        debug!(key = %key, generation, "Live query requested");

        if nothing {
            bump(revision);
            return;
        }

        let guard = Guard {
            slot: Arc::downgrade(&slot.state),
            generation,
            collection: slot.collection,
            revision: revision.clone(),
        };
        let on_snapshot = {
            let guard = guard.clone();
            Arc::new(move |snapshot: Snapshot| guard.apply_snapshot(snapshot))
        };
        let on_error = {
            let guard = guard.clone();
            Arc::new(move |error: StoreError| guard.apply_error(&error))
        };

        match store.subscribe(slot.collection, &slot.filter, on_snapshot, on_error) {
            Ok(subscription) => slot.subscription = Some(subscription),
            Err(error) => guard.apply_error(&error),
        }
    }

    /// Re-open every failed query
    pub fn retry(&mut self) {
        for (name, slot) in &mut self.slots {
            let key = {
                let state = slot.state.lock();
                match (&state.phase, &state.key) {
                    (QueryPhase::Error(_), Some(key)) => key.clone(),
                    _ => continue,
                }
            };
            debug!(slot = %name, "Retrying live query");
            Self::open(self.store.as_ref(), &self.revision, slot, key);
        }
    }

    /// Tear down and forget `slot`
    pub fn release(&mut self, slot: &str) {
        if let Some(mut removed) = self.slots.remove(slot) {
            Self::teardown(&mut removed);
        }
    }

    /// Tear down every slot. Safe to call more than once.
    pub fn release_all(&mut self) {
        for slot in self.slots.values_mut() {
            Self::teardown(slot);
        }
        self.slots.clear();
    }

    fn teardown(slot: &mut Slot) {
        {
            let mut state = slot.state.lock();
            if state.phase != QueryPhase::TornDown {
                state.generation += 1;
                state.phase = QueryPhase::TornDown;
                debug!(collection = %slot.collection, "Live query torn down");
            }
        }
        if let Some(mut subscription) = slot.subscription.take() {
            subscription.unsubscribe();
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current result set of `slot`; empty when unknown
    pub fn documents(&self, slot: &str) -> Vec<Document> {
        self.slots
            .get(slot)
            .map(|s| s.state.lock().documents.clone())
            .unwrap_or_default()
    }

    pub fn phase(&self, slot: &str) -> QueryPhase {
        self.slots
            .get(slot)
            .map_or(QueryPhase::Idle, |s| s.state.lock().phase.clone())
    }

    pub fn key(&self, slot: &str) -> Option<QueryKey> {
        self.slots.get(slot).and_then(|s| s.state.lock().key.clone())
    }

    /// Any slot still waiting for its first result set
    pub fn is_loading(&self) -> bool {
        self.slots.values().any(|s| s.state.lock().phase.is_loading())
    }

    /// First failure among the slots, by slot name
    pub fn error(&self) -> Option<String> {
        self.slots.values().find_map(|s| {
            s.state
                .lock()
                .phase
                .error()
                .map(|message| format!("{}: {message}", s.collection))
        })
    }

    /// Current revision; changes whenever any slot applies a result or error
    pub fn revision(&self) -> u64 {
        *self.revision_rx.borrow()
    }

    /// Wait until the revision moves past the last one seen here
    pub async fn changed(&mut self) {
        // The sender lives as long as `self`, so this cannot fail
        let _ = self.revision_rx.changed().await;
    }

    /// Mark the current revision as seen
    pub fn mark_seen(&mut self) {
        self.revision_rx.borrow_and_update();
    }
}

impl Drop for SubscriptionManager {
    fn drop(&mut self) {
        self.release_all();
    }
}
