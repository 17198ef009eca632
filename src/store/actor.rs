//! # Store Actor
//!
//! The `StoreActor` is the only owner of the low-stock rows. It processes
//! [`StoreRequest`]s one at a time, so the backend never sees concurrent
//! access and needs no locks.

use super::backend::StorageBackend;
use super::client::LowStockStore;
use super::message::StoreRequest;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Server half of the store. Created with [`StoreActor::new`] and driven by
/// [`StoreActor::run`], usually inside `tokio::spawn`.
///
/// ```rust
/// use low_stock_watch::store::{MemoryBackend, StoreActor};
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, store) = StoreActor::new(MemoryBackend::new(), 8);
///     let handle = tokio::spawn(actor.run());
///
///     assert_eq!(store.count().await.unwrap(), 0);
///     assert!(store.flush().await);
///
///     drop(store);
///     handle.await.unwrap();
/// }
/// ```
pub struct StoreActor<B: StorageBackend> {
    receiver: mpsc::Receiver<StoreRequest>,
    backend: B,
}

impl<B: StorageBackend> StoreActor<B> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is full.
    pub fn new(backend: B, buffer_size: usize) -> (Self, LowStockStore) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, backend };
        (actor, LowStockStore::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        info!("Store actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Append { drafts, respond_to } => {
                    debug!(rows = drafts.len(), "Append");
                    let result = self.backend.append(drafts).await;
                    match &result {
                        Ok(records) => info!(rows = records.len(), "Appended"),
                        Err(e) => warn!(error = %e, "Append failed"),
                    }
                    let _ = respond_to.send(result.map_err(Into::into));
                }
                StoreRequest::Flush { respond_to } => {
                    debug!("Flush");
                    let result = self.backend.flush().await;
                    match &result {
                        Ok(()) => info!("Flushed"),
                        Err(e) => warn!(error = %e, "Flush failed"),
                    }
                    let _ = respond_to.send(result.map_err(Into::into));
                }
                StoreRequest::ListAll { respond_to } => {
                    let result = self.backend.list_all().await;
                    debug!(ok = result.is_ok(), "ListAll");
                    let _ = respond_to.send(result.map_err(Into::into));
                }
                StoreRequest::Count { respond_to } => {
                    let result = self.backend.count().await;
                    debug!(ok = result.is_ok(), "Count");
                    let _ = respond_to.send(result.map_err(Into::into));
                }
            }
        }

        info!("Store actor shutdown");
    }
}
