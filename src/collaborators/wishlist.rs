use crate::model::WishlistEntry;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// A lazily consumed, finite run of wishlist entries.
pub type WishlistEntries = Box<dyn Iterator<Item = WishlistEntry> + Send>;

/// Errors raised while enumerating wishlists.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WishlistError {
    #[error("Wishlist source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the wishlist entries a run examines.
///
/// Every call starts a fresh enumeration, so a source can be listed again on
/// the next run. No entries is a valid, empty result.
#[async_trait]
pub trait WishlistSource: Send + Sync {
    async fn list_wishlist_entries(&self) -> Result<WishlistEntries, WishlistError>;
}

/// Wishlist entries held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWishlist {
    entries: Arc<RwLock<Vec<WishlistEntry>>>,
}

impl InMemoryWishlist {
    pub fn new(entries: Vec<WishlistEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn add(&self, entry: WishlistEntry) -> Result<(), WishlistError> {
        self.entries
            .write()
            .map_err(|_| WishlistError::Unavailable("wishlist lock poisoned".to_string()))?
            .push(entry);
        Ok(())
    }
}

#[async_trait]
impl WishlistSource for InMemoryWishlist {
    async fn list_wishlist_entries(&self) -> Result<WishlistEntries, WishlistError> {
        let snapshot = self
            .entries
            .read()
            .map_err(|_| WishlistError::Unavailable("wishlist lock poisoned".to_string()))?
            .clone();
        Ok(Box::new(snapshot.into_iter()))
    }
}
