use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

impl From<u64> for CustomerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "customer_{}", self.0)
    }
}

/// Type-safe identifier for wishlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistId(pub u64);

impl From<u64> for WishlistId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for WishlistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wishlist_{}", self.0)
    }
}

/// One customer's recorded interest in one product.
///
/// Entries are supplied by a [`WishlistSource`](crate::collaborators::WishlistSource)
/// and are never modified by the watch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub customer_id: CustomerId,
    pub product_sku: String,
    pub wishlist_id: WishlistId,
}

impl WishlistEntry {
    /// Creates a new entry.
    ///
    /// # Arguments
    /// * `customer_id` - Owner of the wishlist
    /// * `product_sku` - SKU of the wished-for product
    /// * `wishlist_id` - Wishlist the item belongs to
    pub fn new(customer_id: u64, product_sku: impl Into<String>, wishlist_id: u64) -> Self {
        Self {
            customer_id: CustomerId(customer_id),
            product_sku: product_sku.into(),
            wishlist_id: WishlistId(wishlist_id),
        }
    }
}
