//! # ThresholdEvaluator
//!
//! Turns one wishlist entry and the current readings for its SKU into draft
//! low-stock records. Pure: no I/O, no state.

use crate::model::{LowStockDraft, SourceQuantity, WishlistEntry};

/// Emits one draft per reading of the entry's SKU whose quantity is strictly
/// below `threshold`.
///
/// Readings for other SKUs are ignored. A quantity equal to the threshold is
/// not low. Drafts keep the order of `quantities`, and several low sources
/// for the same SKU each produce their own draft.
pub fn evaluate(
    entry: &WishlistEntry,
    quantities: &[SourceQuantity],
    threshold: f64,
) -> Vec<LowStockDraft> {
    quantities
        .iter()
        .filter(|reading| reading.sku == entry.product_sku)
        .filter(|reading| reading.quantity_on_hand < threshold)
        .map(|reading| LowStockDraft::from_reading(entry, reading))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CustomerId;

    fn entry() -> WishlistEntry {
        WishlistEntry::new(1, "ABC", 100)
    }

    #[test]
    fn test_below_threshold_is_low() {
        let quantities = vec![SourceQuantity::new("ABC", "default", 3.0)];

        let drafts = evaluate(&entry(), &quantities, 5.0);

        assert_eq!(
            drafts,
            vec![LowStockDraft {
                customer_id: CustomerId(1),
                sku: "ABC".to_string(),
                source_name: "default".to_string(),
                source_qty: 3.0,
            }]
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        for threshold in [0.0, 1.0, 2.5, 5.0, 100.0] {
            for qty in [0.0, 1.0, 2.5, 4.999, 5.0, 5.001, 100.0] {
                let quantities = vec![SourceQuantity::new("ABC", "default", qty)];
                let drafts = evaluate(&entry(), &quantities, threshold);
                assert_eq!(
                    drafts.len(),
                    usize::from(qty < threshold),
                    "qty {} threshold {}",
                    qty,
                    threshold
                );
            }
        }
    }

    #[test]
    fn test_each_low_source_is_reported_in_order() {
        let quantities = vec![
            SourceQuantity::new("ABC", "north", 1.0),
            SourceQuantity::new("ABC", "south", 8.0),
            SourceQuantity::new("ABC", "east", 0.0),
            SourceQuantity::new("ABC", "north", 2.0),
        ];

        let drafts = evaluate(&entry(), &quantities, 5.0);
        let sources: Vec<_> = drafts.iter().map(|d| d.source_name.as_str()).collect();

        assert_eq!(sources, vec!["north", "east", "north"]);
    }

    #[test]
    fn test_readings_for_other_skus_are_ignored() {
        let quantities = vec![
            SourceQuantity::new("XYZ", "default", 0.0),
            SourceQuantity::new("ABC", "default", 9.0),
        ];

        assert!(evaluate(&entry(), &quantities, 5.0).is_empty());
    }

    #[test]
    fn test_no_sources_no_drafts() {
        assert!(evaluate(&entry(), &[], 5.0).is_empty());
    }

    #[test]
    fn test_unreadable_quantity_is_not_low() {
        let quantities = vec![
            SourceQuantity::new("ABC", "default", f64::NAN),
            SourceQuantity::new("ABC", "backup", 1.0),
        ];

        let drafts = evaluate(&entry(), &quantities, 5.0);

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].source_name, "backup");
    }
}
