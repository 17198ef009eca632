use super::{CustomerId, SourceQuantity, WishlistEntry};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Surrogate key assigned by the store when a record is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl From<u64> for RowId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row_{}", self.0)
    }
}

/// A low-stock finding that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockDraft {
    pub customer_id: CustomerId,
    pub sku: String,
    pub source_name: String,
    pub source_qty: f64,
}

impl LowStockDraft {
    /// Builds a draft for `entry` from one source reading.
    pub fn from_reading(entry: &WishlistEntry, reading: &SourceQuantity) -> Self {
        Self {
            customer_id: entry.customer_id,
            sku: entry.product_sku.clone(),
            source_name: reading.source_name.clone(),
            source_qty: reading.quantity_on_hand,
        }
    }

    /// Attaches the surrogate key, turning the draft into a stored record.
    pub fn into_record(self, row_id: RowId) -> LowStockRecord {
        LowStockRecord {
            row_id,
            customer_id: self.customer_id,
            sku: self.sku,
            source_name: self.source_name,
            source_qty: self.source_qty,
        }
    }
}

/// A persisted low-stock finding. One row of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockRecord {
    pub row_id: RowId,
    pub customer_id: CustomerId,
    pub sku: String,
    pub source_name: String,
    pub source_qty: f64,
}
