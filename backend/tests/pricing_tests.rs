//! Slab pricing tests
//!
//! Tests for slab table validation and price resolution including:
//! - Unit price matches the slab containing the quantity
//! - Prices never increase as the aggregated quantity grows
//! - Slab tables must be contiguous with non-increasing prices

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::models::Slab;
use shared::pricing::{next_slab_preview, slab_index_for, unit_price_for, PricingError};
use shared::validation::validate_slab_table;

fn slab(min_qty: i64, max_qty: Option<i64>, unit_price: i64) -> Slab {
    Slab {
        min_qty,
        max_qty,
        unit_price: Decimal::from(unit_price),
    }
}

/// The standard three-tier table used across these tests:
/// 1-10 at 100, 11-50 at 90, 51+ at 80
fn standard_table() -> Vec<Slab> {
    vec![
        slab(1, Some(10), 100),
        slab(11, Some(50), 90),
        slab(51, None, 80),
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_price_at_slab_boundaries() {
        let slabs = standard_table();

        assert_eq!(unit_price_for(&slabs, 1).unwrap(), Decimal::from(100));
        assert_eq!(unit_price_for(&slabs, 10).unwrap(), Decimal::from(100));
        assert_eq!(unit_price_for(&slabs, 11).unwrap(), Decimal::from(90));
        assert_eq!(unit_price_for(&slabs, 50).unwrap(), Decimal::from(90));
        assert_eq!(unit_price_for(&slabs, 51).unwrap(), Decimal::from(80));
    }

    #[test]
    fn test_unbounded_final_slab_covers_large_quantities() {
        let slabs = standard_table();
        assert_eq!(unit_price_for(&slabs, 1_000_000).unwrap(), Decimal::from(80));
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        let slabs = standard_table();
        assert_eq!(
            unit_price_for(&slabs, 0).unwrap_err(),
            PricingError::InvalidQuantity
        );
        assert_eq!(
            unit_price_for(&slabs, -10).unwrap_err(),
            PricingError::InvalidQuantity
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(
            unit_price_for(&[], 10).unwrap_err(),
            PricingError::EmptySlabTable
        );
    }

    #[test]
    fn test_table_starting_above_one_uses_first_slab_as_fallback() {
        let slabs = vec![slab(10, Some(50), 90), slab(51, None, 80)];
        assert_eq!(slab_index_for(&slabs, 5).unwrap(), 0);
        assert_eq!(unit_price_for(&slabs, 5).unwrap(), Decimal::from(90));
    }

    #[test]
    fn test_next_slab_preview() {
        let slabs = standard_table();

        let preview = next_slab_preview(&slabs, 7).unwrap().unwrap();
        assert_eq!(preview.next_price, Decimal::from(90));
        assert_eq!(preview.qty_needed, 4);
        assert_eq!(preview.per_unit_savings, Decimal::from(10));
    }

    #[test]
    fn test_final_slab_has_no_preview() {
        let slabs = standard_table();
        assert!(next_slab_preview(&slabs, 51).unwrap().is_none());
    }

    #[test]
    fn test_valid_table_passes_validation() {
        assert!(validate_slab_table(&standard_table()).is_ok());
    }

    #[test]
    fn test_gap_in_table_rejected() {
        let slabs = vec![slab(1, Some(10), 100), slab(12, None, 90)];
        assert!(validate_slab_table(&slabs).is_err());
    }

    #[test]
    fn test_overlap_in_table_rejected() {
        let slabs = vec![slab(1, Some(10), 100), slab(10, None, 90)];
        assert!(validate_slab_table(&slabs).is_err());
    }

    #[test]
    fn test_increasing_prices_rejected() {
        let slabs = vec![slab(1, Some(10), 80), slab(11, None, 90)];
        assert!(validate_slab_table(&slabs).is_err());
    }

    #[test]
    fn test_bounded_final_slab_rejected() {
        let slabs = vec![slab(1, Some(10), 100), slab(11, Some(50), 90)];
        assert!(validate_slab_table(&slabs).is_err());
    }

    #[test]
    fn test_unbounded_middle_slab_rejected() {
        let slabs = vec![slab(1, None, 100), slab(11, None, 90)];
        assert!(validate_slab_table(&slabs).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for a well-formed slab table: contiguous from 1, final slab
    /// unbounded, prices strictly positive and non-increasing
    fn slab_table_strategy() -> impl Strategy<Value = Vec<Slab>> {
        (
            prop::collection::vec(1i64..=100, 0..4), // bounded segment widths
            1i64..=500,                              // top price
            prop::collection::vec(0i64..=50, 0..4),  // price drops per tier
        )
            .prop_map(|(widths, top_price, drops)| {
                let mut slabs = Vec::new();
                let mut min_qty = 1i64;
                let mut price = top_price;
                let mut drops = drops.into_iter();

                for width in widths {
                    slabs.push(Slab {
                        min_qty,
                        max_qty: Some(min_qty + width - 1),
                        unit_price: Decimal::from(price),
                    });
                    min_qty += width;
                    price = (price - drops.next().unwrap_or(0)).max(1);
                }

                slabs.push(Slab {
                    min_qty,
                    max_qty: None,
                    unit_price: Decimal::from(price),
                });
                slabs
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Generated tables always satisfy the creation-time validator
        #[test]
        fn prop_generated_tables_are_valid(slabs in slab_table_strategy()) {
            prop_assert!(validate_slab_table(&slabs).is_ok());
        }

        /// Every positive quantity resolves to exactly one slab
        #[test]
        fn prop_every_quantity_has_a_price(
            slabs in slab_table_strategy(),
            quantity in 1i64..=10_000
        ) {
            prop_assert!(unit_price_for(&slabs, quantity).is_ok());
        }

        /// Unit price never increases as the quantity grows
        #[test]
        fn prop_price_monotonically_non_increasing(
            slabs in slab_table_strategy(),
            quantity in 1i64..=5_000,
            extra in 1i64..=5_000
        ) {
            let before = unit_price_for(&slabs, quantity).unwrap();
            let after = unit_price_for(&slabs, quantity + extra).unwrap();
            prop_assert!(after <= before);
        }

        /// The resolved slab actually contains the quantity (no fallback
        /// needed for tables starting at 1)
        #[test]
        fn prop_resolved_slab_contains_quantity(
            slabs in slab_table_strategy(),
            quantity in 1i64..=10_000
        ) {
            let idx = slab_index_for(&slabs, quantity).unwrap();
            prop_assert!(slabs[idx].contains(quantity));
        }

        /// A next-slab preview always points at a strictly larger quantity
        /// and a price no higher than the current one
        #[test]
        fn prop_preview_is_an_incentive(
            slabs in slab_table_strategy(),
            quantity in 1i64..=10_000
        ) {
            let current = unit_price_for(&slabs, quantity).unwrap();
            if let Some(preview) = next_slab_preview(&slabs, quantity).unwrap() {
                prop_assert!(preview.qty_needed > 0);
                prop_assert!(preview.next_price <= current);
                prop_assert_eq!(preview.per_unit_savings, current - preview.next_price);
            }
        }
    }
}
