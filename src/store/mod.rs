//! # LowStockStore
//!
//! Append-only persistence for low-stock findings.
//!
//! ## Structure
//!
//! - [`backend`] - [`StorageBackend`] trait and the in-memory [`MemoryBackend`]
//! - [`jsonl`] - [`JsonlBackend`], a durable JSON-lines file
//! - [`actor`] - [`StoreActor`], the single owner of the rows
//! - [`client`] - [`LowStockStore`], the cloneable handle everyone else uses
//! - [`error`] - [`StorageError`] and [`StoreError`]
//! - [`mock`] - request-level test helpers
//!
//! ## Error asymmetry
//!
//! A failed [`append`](LowStockStore::append) is an error the caller must
//! handle. A failed [`flush`](LowStockStore::flush) is only a `false`: flush
//! is a best-effort administrative reset.

pub mod actor;
pub mod backend;
pub mod client;
pub mod error;
pub mod jsonl;
pub mod message;
pub mod mock;

pub use actor::*;
pub use backend::*;
pub use client::*;
pub use error::*;
pub use jsonl::*;
pub use message::*;

/// Default request channel capacity.
pub const STORE_BUFFER: usize = 32;

/// Creates a store actor over `backend` and its client.
pub fn new<B: StorageBackend>(backend: B) -> (StoreActor<B>, LowStockStore) {
    StoreActor::new(backend, STORE_BUFFER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerId, LowStockDraft};

    fn draft(sku: &str) -> LowStockDraft {
        LowStockDraft {
            customer_id: CustomerId(1),
            sku: sku.to_string(),
            source_name: "default".to_string(),
            source_qty: 1.0,
        }
    }

    #[tokio::test]
    async fn test_real_actor_round_trip() {
        let (actor, store) = new(MemoryBackend::new());
        let handle = tokio::spawn(actor.run());

        let stored = store.append(vec![draft("A"), draft("B")]).await.unwrap();
        assert_eq!(stored.len(), 2);
        store.append(vec![draft("A")]).await.unwrap();

        let rows = store.list_all().await.unwrap();
        let skus: Vec<_> = rows.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["A", "B", "A"]);

        assert!(store.flush().await);
        assert!(store.flush().await);
        assert_eq!(store.count().await.unwrap(), 0);

        drop(store);
        handle.await.unwrap();
    }
}
