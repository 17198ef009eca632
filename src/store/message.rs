//! Messages exchanged between [`LowStockStore`](super::LowStockStore) and
//! [`StoreActor`](super::StoreActor).

use super::error::StoreError;
use crate::model::{LowStockDraft, LowStockRecord};
use tokio::sync::oneshot;

/// One-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Requests understood by the store actor.
///
/// The store is an append-only log of findings, so there is no update or
/// per-row delete; `Flush` is the only way rows leave it.
#[derive(Debug)]
pub enum StoreRequest {
    Append {
        drafts: Vec<LowStockDraft>,
        respond_to: Response<Vec<LowStockRecord>>,
    },
    Flush {
        respond_to: Response<()>,
    },
    ListAll {
        respond_to: Response<Vec<LowStockRecord>>,
    },
    Count {
        respond_to: Response<usize>,
    },
}
