//! Errors that fail a whole run.

use super::state::JobState;
use crate::collaborators::{InventoryError, WishlistError};
use crate::config::ConfigError;
use crate::store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// A run-level failure. The run ends in [`JobState::Failed`] with nothing persisted.
///
/// Per-entry problems (an unknown SKU) never show up here; the runner skips
/// those entries and carries on.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    ConfigUnavailable(#[from] ConfigError),

    #[error(transparent)]
    Wishlist(#[from] WishlistError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Fetch and evaluate exceeded the {0:?} deadline")]
    DeadlineExceeded(Duration),

    #[error("Inventory worker failed: {0}")]
    Worker(String),

    #[error("Storage write failed: {0}")]
    StorageWrite(#[from] StoreError),
}

impl JobError {
    /// The state the run was in when it failed.
    pub fn stage(&self) -> JobState {
        match self {
            JobError::ConfigUnavailable(_) => JobState::Gated,
            JobError::Wishlist(_) => JobState::Fetching,
            JobError::Inventory(_) | JobError::DeadlineExceeded(_) | JobError::Worker(_) => {
                JobState::Evaluating
            }
            JobError::StorageWrite(_) => JobState::Persisting,
        }
    }
}
