//! # LowStockStore
//!
//! Cloneable handle to a running [`StoreActor`](super::StoreActor).

use super::error::StoreError;
use super::message::StoreRequest;
use crate::model::{LowStockDraft, LowStockRecord};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};

/// Client for the low-stock store.
///
/// Holds only a channel sender, so cloning is cheap.
#[derive(Clone, Debug)]
pub struct LowStockStore {
    sender: mpsc::Sender<StoreRequest>,
}

impl LowStockStore {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    /// Appends every draft as a new row and returns the stored records.
    ///
    /// A failure here means nothing from the batch was stored.
    #[instrument(skip(self, drafts), fields(rows = drafts.len()))]
    pub async fn append(&self, drafts: Vec<LowStockDraft>) -> Result<Vec<LowStockRecord>, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Append { drafts, respond_to })
            .await
    }

    /// Removes every row.
    ///
    /// Returns `false` on any failure instead of an error. The store's state
    /// is then unknown and the caller should retry or alert an operator.
    #[instrument(skip(self))]
    pub async fn flush(&self) -> bool {
        debug!("Sending request");
        match self
            .request(|respond_to| StoreRequest::Flush { respond_to })
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Flush failed, store state unknown");
                false
            }
        }
    }

    /// Snapshot of every row, in insertion order.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<LowStockRecord>, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::ListAll { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<usize, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Count { respond_to })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CustomerId;
    use crate::store::error::StorageError;
    use crate::store::mock::{create_mock_store, expect_append, expect_flush};

    fn draft() -> LowStockDraft {
        LowStockDraft {
            customer_id: CustomerId(1),
            sku: "ABC".to_string(),
            source_name: "default".to_string(),
            source_qty: 3.0,
        }
    }

    #[tokio::test]
    async fn test_append_forwards_the_batch() {
        let (store, mut receiver) = create_mock_store(10);

        let task = tokio::spawn(async move { store.append(vec![draft(), draft()]).await });

        let (drafts, responder) = expect_append(&mut receiver)
            .await
            .expect("Expected Append request");
        assert_eq!(drafts.len(), 2);

        let records = drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| d.into_record((i as u64 + 1).into()))
            .collect();
        responder.send(Ok(records)).unwrap();

        let stored = task.await.unwrap().unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_append_surfaces_storage_failure() {
        let (store, mut receiver) = create_mock_store(10);

        let task = tokio::spawn(async move { store.append(vec![draft()]).await });

        let (_, responder) = expect_append(&mut receiver).await.unwrap();
        responder
            .send(Err(StorageError::Unavailable("disk full".to_string()).into()))
            .unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(StoreError::Storage(_))));
    }

    #[tokio::test]
    async fn test_flush_swallows_storage_failure() {
        let (store, mut receiver) = create_mock_store(10);

        let task = tokio::spawn(async move { store.flush().await });

        let responder = expect_flush(&mut receiver).await.unwrap();
        responder
            .send(Err(StorageError::Unavailable("locked".to_string()).into()))
            .unwrap();

        assert!(!task.await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_actor() {
        let (store, receiver) = create_mock_store(10);
        drop(receiver);

        assert!(matches!(store.count().await, Err(StoreError::ActorClosed)));
        assert!(!store.flush().await);
    }

    #[tokio::test]
    async fn test_dropped_response() {
        let (store, mut receiver) = create_mock_store(10);

        let task = tokio::spawn(async move { store.list_all().await });
        drop(receiver.recv().await);

        assert!(matches!(task.await.unwrap(), Err(StoreError::ActorDropped)));
    }
}
