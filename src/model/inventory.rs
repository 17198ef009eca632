use serde::{Deserialize, Serialize};

/// Quantity on hand of one SKU at one named inventory source.
///
/// Supplied fresh by an [`InventorySource`](crate::collaborators::InventorySource)
/// on every run and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceQuantity {
    pub sku: String,
    pub source_name: String,
    pub quantity_on_hand: f64,
}

impl SourceQuantity {
    /// Creates a new quantity reading.
    ///
    /// Negative readings are clamped to zero; a source can't hold less than nothing.
    /// `NaN` is kept as is, and never compares below a threshold.
    pub fn new(sku: impl Into<String>, source_name: impl Into<String>, quantity_on_hand: f64) -> Self {
        Self {
            sku: sku.into(),
            source_name: source_name.into(),
            quantity_on_hand: if quantity_on_hand < 0.0 { 0.0 } else { quantity_on_hand },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_quantity_is_clamped() {
        assert_eq!(SourceQuantity::new("ABC", "default", -3.0).quantity_on_hand, 0.0);
        assert_eq!(SourceQuantity::new("ABC", "default", f64::NEG_INFINITY).quantity_on_hand, 0.0);
        assert_eq!(SourceQuantity::new("ABC", "default", 2.5).quantity_on_hand, 2.5);
    }

    #[test]
    fn test_nan_quantity_is_not_zeroed() {
        assert!(SourceQuantity::new("ABC", "default", f64::NAN).quantity_on_hand.is_nan());
    }
}
