//! Store change events - reported by a record store for every committed write
//!
//! These events are used for:
//! - Deciding which live listeners must receive a fresh snapshot
//! - Audit logging of mutations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Collection, RecordId};

/// What happened to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// A single committed write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreChange {
    pub collection: Collection,
    pub id: RecordId,
    pub kind: ChangeKind,
    pub at: DateTime<Utc>,
}

impl StoreChange {
    pub fn new(collection: Collection, id: RecordId, kind: ChangeKind) -> Self {
        Self {
            collection,
            id,
            kind,
            at: Utc::now(),
        }
    }

    pub fn created(collection: Collection, id: RecordId) -> Self {
        Self::new(collection, id, ChangeKind::Created)
    }

    pub fn updated(collection: Collection, id: RecordId) -> Self {
        Self::new(collection, id, ChangeKind::Updated)
    }

    pub fn deleted(collection: Collection, id: RecordId) -> Self {
        Self::new(collection, id, ChangeKind::Deleted)
    }

    /// Get the event name for logs
    pub fn event_name(&self) -> String {
        format!("{}.{}", self.collection, self.kind.as_str())
    }
}
