//! State of a single live query
//!
//! Lifecycle: `Idle -> Subscribing -> Active -> (Error | TornDown)`.
//! Every subscription attempt bumps the slot generation; callbacks carry the
//! generation they were registered under and are dropped once it is stale.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use reel_core::{Collection, Document, QueryKey, Snapshot, StoreError};
use serde::Serialize;
use tokio::sync::watch;

/// Lifecycle phase of a live query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "message", rename_all = "snake_case")]
pub enum QueryPhase {
    Idle,
    Subscribing,
    Active,
    Error(String),
    TornDown,
}

impl QueryPhase {
    /// Still waiting for the first result set
    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Idle | Self::Subscribing)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Snapshots are no longer applied in this phase
    #[inline]
    fn is_closed(&self) -> bool {
        matches!(self, Self::Error(_) | Self::TornDown)
    }
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Subscribing => f.write_str("subscribing"),
            Self::Active => f.write_str("active"),
            Self::Error(message) => write!(f, "error: {message}"),
            Self::TornDown => f.write_str("torn down"),
        }
    }
}

pub(crate) struct SlotState {
    pub generation: u64,
    pub key: Option<QueryKey>,
    pub phase: QueryPhase,
    /// Last applied result set, ordered by id without duplicates
    pub documents: Vec<Document>,
}

impl SlotState {
    pub fn new() -> Self {
        Self {
            generation: 0,
            key: None,
            phase: QueryPhase::Idle,
            documents: Vec::new(),
        }
    }
}

pub(crate) type SharedSlot = Arc<Mutex<SlotState>>;

/// Shared change counter; every applied snapshot or error bumps it
pub(crate) type Revision = Arc<watch::Sender<u64>>;

pub(crate) fn bump(revision: &Revision) {
    revision.send_modify(|rev| *rev = rev.wrapping_add(1));
}

/// Order by id and drop repeated ids, keeping the first occurrence
pub(crate) fn normalize(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|a, b| a.id.cmp(&b.id));
    documents.dedup_by(|later, earlier| later.id == earlier.id);
    documents
}

/// Callback context bound to one subscription attempt
#[derive(Clone)]
pub(crate) struct Guard {
    pub slot: Weak<Mutex<SlotState>>,
    pub generation: u64,
    pub collection: Collection,
    pub revision: Revision,
}

impl Guard {
    pub fn apply_snapshot(&self, snapshot: Snapshot) {
        let Some(slot) = self.slot.upgrade() else {
            return;
        };
        {
            let mut state = slot.lock();
            if state.generation != self.generation {
                tracing::warn!(
                    collection = %self.collection,
                    generation = self.generation,
                    current = state.generation,
                    "Ignoring snapshot from a replaced subscription"
                );
                return;
            }
            if state.phase.is_closed() {
                tracing::trace!(
                    collection = %self.collection,
                    phase = %state.phase,
                    "Ignoring snapshot for a closed query"
                );
                return;
            }
            state.documents = normalize(snapshot.documents);
            state.phase = QueryPhase::Active;
            tracing::trace!(
                collection = %self.collection,
                documents = state.documents.len(),
                "Snapshot applied"
            );
        }
        bump(&self.revision);
    }

    pub fn apply_error(&self, error: &StoreError) {
        let Some(slot) = self.slot.upgrade() else {
            return;
        };
        {
            let mut state = slot.lock();
            if state.generation != self.generation || state.phase == QueryPhase::TornDown {
                tracing::warn!(
                    collection = %self.collection,
                    error = %error,
                    "Ignoring error from a replaced subscription"
                );
                return;
            }
            // The last good result set stays visible
            state.phase = QueryPhase::Error(error.to_string());
            tracing::warn!(collection = %self.collection, error = %error, "Live query failed");
        }
        bump(&self.revision);
    }
}
