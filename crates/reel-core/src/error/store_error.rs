//! Store errors - failures reported by a record store adapter

use thiserror::Error;

use crate::value_objects::{Collection, RecordId};

/// Errors a record store reports for reads, writes and subscriptions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Permission denied on {0}")]
    PermissionDenied(Collection),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: Collection, id: RecordId },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Network-class failure; the caller may request the operation again
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
            Self::Timeout(_) => "STORE_TIMEOUT",
            Self::PermissionDenied(_) => "STORE_PERMISSION_DENIED",
            Self::NotFound { .. } => "STORE_NOT_FOUND",
            Self::InvalidQuery(_) => "STORE_INVALID_QUERY",
            Self::Internal(_) => "STORE_ERROR",
        }
    }
}
