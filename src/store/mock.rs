//! # Store Mocks
//!
//! Helpers for testing code that talks to a [`LowStockStore`] without running
//! a [`StoreActor`](super::StoreActor).
//!
//! [`create_mock_store`] returns a client together with the raw request
//! receiver. The test plays the actor: it pulls the next request with one of
//! the `expect_*` helpers, asserts on it, and answers through the responder.
//! That makes storage failures trivial to inject.
//!
//! ```rust
//! use low_stock_watch::store::mock::{create_mock_store, expect_flush};
//! use low_stock_watch::store::StorageError;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (store, mut receiver) = create_mock_store(4);
//!     let task = tokio::spawn(async move { store.flush().await });
//!
//!     let responder = expect_flush(&mut receiver).await.unwrap();
//!     responder
//!         .send(Err(StorageError::Unavailable("locked".into()).into()))
//!         .unwrap();
//!
//!     assert!(!task.await.unwrap());
//! }
//! ```

use super::client::LowStockStore;
use super::message::{Response, StoreRequest};
use crate::model::{LowStockDraft, LowStockRecord};
use tokio::sync::mpsc;

/// Creates a store client and a receiver for asserting its requests.
pub fn create_mock_store(buffer_size: usize) -> (LowStockStore, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (LowStockStore::new(sender), receiver)
}

/// Returns the next request if it is an `Append`.
pub async fn expect_append(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(Vec<LowStockDraft>, Response<Vec<LowStockRecord>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Append { drafts, respond_to }) => Some((drafts, respond_to)),
        _ => None,
    }
}

/// Returns the next request's responder if it is a `Flush`.
pub async fn expect_flush(receiver: &mut mpsc::Receiver<StoreRequest>) -> Option<Response<()>> {
    match receiver.recv().await {
        Some(StoreRequest::Flush { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Returns the next request's responder if it is a `ListAll`.
pub async fn expect_list_all(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<Response<Vec<LowStockRecord>>> {
    match receiver.recv().await {
        Some(StoreRequest::ListAll { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Returns the next request's responder if it is a `Count`.
pub async fn expect_count(receiver: &mut mpsc::Receiver<StoreRequest>) -> Option<Response<usize>> {
    match receiver.recv().await {
        Some(StoreRequest::Count { respond_to }) => Some(respond_to),
        _ => None,
    }
}
