//! # Storage Backends
//!
//! A [`StorageBackend`] is the durable part of the store. It is owned by a
//! single [`StoreActor`](super::StoreActor), so implementations need no
//! internal locking.

use super::error::StorageError;
use crate::model::{LowStockDraft, LowStockRecord, RowId};
use async_trait::async_trait;

/// Persistence for low-stock records.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Inserts every draft as a new row with a fresh, strictly increasing id.
    ///
    /// Never updates or merges existing rows. Either the whole batch is
    /// stored or none of it is.
    async fn append(&mut self, drafts: Vec<LowStockDraft>) -> Result<Vec<LowStockRecord>, StorageError>;

    /// Removes every row. Flushing an empty store succeeds.
    async fn flush(&mut self) -> Result<(), StorageError>;

    /// All rows in insertion order.
    async fn list_all(&self) -> Result<Vec<LowStockRecord>, StorageError>;

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.list_all().await?.len())
    }
}

/// Keeps rows in a `Vec`. Contents are lost when the actor stops.
#[derive(Debug)]
pub struct MemoryBackend {
    rows: Vec<LowStockRecord>,
    next_id: u64,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn append(&mut self, drafts: Vec<LowStockDraft>) -> Result<Vec<LowStockRecord>, StorageError> {
        let records: Vec<_> = drafts
            .into_iter()
            .enumerate()
            .map(|(offset, draft)| draft.into_record(RowId(self.next_id + offset as u64)))
            .collect();
        self.next_id += records.len() as u64;
        self.rows.extend(records.iter().cloned());
        Ok(records)
    }

    async fn flush(&mut self) -> Result<(), StorageError> {
        self.rows.clear();
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<LowStockRecord>, StorageError> {
        Ok(self.rows.clone())
    }

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.rows.len())
    }
}
