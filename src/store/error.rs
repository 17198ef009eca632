//! Error types for the low-stock store.

use thiserror::Error;

/// Failures of the storage layer underneath the store actor.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode record: {0}")]
    Encode(String),

    #[error("Corrupt record on line {line}: {reason}")]
    Decode { line: usize, reason: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned to callers of [`LowStockStore`](super::LowStockStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store actor closed")]
    ActorClosed,

    #[error("Store actor dropped response channel")]
    ActorDropped,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
