//! Order placement and aggregation tests
//!
//! Tests for the zone-wide aggregation core including:
//! - Pricing at the prospective aggregated quantity
//! - The open -> ready_to_pack threshold firing exactly once
//! - Price snapshots that survive later aggregation growth

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::models::{
    apply_order_quantity, fulfillment_progress, AggregationError, OfferStatus, Slab,
};
use shared::pricing::unit_price_for;

fn slab(min_qty: i64, max_qty: Option<i64>, unit_price: i64) -> Slab {
    Slab {
        min_qty,
        max_qty,
        unit_price: Decimal::from(unit_price),
    }
}

fn standard_table() -> Vec<Slab> {
    vec![
        slab(1, Some(10), 100),
        slab(11, Some(50), 90),
        slab(51, None, 80),
    ]
}

/// In-memory stand-in for the locked offer row
#[derive(Debug, Clone)]
struct OfferState {
    slabs: Vec<Slab>,
    min_fulfillment_qty: i64,
    aggregated_qty: i64,
    status: OfferStatus,
}

impl OfferState {
    fn new(slabs: Vec<Slab>, min_fulfillment_qty: i64) -> Self {
        Self {
            slabs,
            min_fulfillment_qty,
            aggregated_qty: 0,
            status: OfferStatus::Open,
        }
    }
}

/// A placed order's price snapshot
#[derive(Debug, Clone, PartialEq)]
struct PlacedOrder {
    quantity: i64,
    unit_price: Decimal,
    total_amount: Decimal,
    crossed_threshold: bool,
}

/// Simulate the placement transaction: aggregate, then price at the
/// prospective quantity, then persist the snapshot
fn simulate_place_order(
    offer: &mut OfferState,
    quantity: i64,
) -> Result<PlacedOrder, AggregationError> {
    let outcome = apply_order_quantity(
        offer.status,
        offer.aggregated_qty,
        offer.min_fulfillment_qty,
        quantity,
    )?;

    let unit_price = unit_price_for(&offer.slabs, outcome.new_aggregated_qty)
        .expect("validated table covers every positive quantity");

    offer.aggregated_qty = outcome.new_aggregated_qty;
    offer.status = outcome.new_status;

    Ok(PlacedOrder {
        quantity,
        unit_price,
        total_amount: unit_price * Decimal::from(quantity),
        crossed_threshold: outcome.crossed_threshold,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// First order of 15 units: zone total becomes 15, priced in the 11-50
    /// slab at 90
    #[test]
    fn test_first_order_priced_at_prospective_quantity() {
        let mut offer = OfferState::new(standard_table(), 50);

        let order = simulate_place_order(&mut offer, 15).unwrap();

        assert_eq!(order.unit_price, Decimal::from(90));
        assert_eq!(order.total_amount, Decimal::from(1350));
        assert!(!order.crossed_threshold);
        assert_eq!(offer.aggregated_qty, 15);
        assert_eq!(offer.status, OfferStatus::Open);
    }

    /// Second order of 40 units on top of 15: prospective total 55 lands in
    /// the 51+ slab at 80 and crosses the threshold of 50
    #[test]
    fn test_threshold_crossing_order_gets_the_deeper_slab() {
        let mut offer = OfferState::new(standard_table(), 50);
        simulate_place_order(&mut offer, 15).unwrap();

        let order = simulate_place_order(&mut offer, 40).unwrap();

        assert_eq!(order.unit_price, Decimal::from(80));
        assert_eq!(order.total_amount, Decimal::from(3200));
        assert!(order.crossed_threshold);
        assert_eq!(offer.aggregated_qty, 55);
        assert_eq!(offer.status, OfferStatus::ReadyToPack);
    }

    /// The first order's snapshot is untouched by the second order
    #[test]
    fn test_earlier_snapshots_never_reprice() {
        let mut offer = OfferState::new(standard_table(), 50);

        let first = simulate_place_order(&mut offer, 15).unwrap();
        simulate_place_order(&mut offer, 40).unwrap();

        assert_eq!(first.unit_price, Decimal::from(90));
        assert_eq!(first.total_amount, Decimal::from(1350));
    }

    #[test]
    fn test_orders_still_accepted_after_threshold() {
        let mut offer = OfferState::new(standard_table(), 50);
        simulate_place_order(&mut offer, 60).unwrap();
        assert_eq!(offer.status, OfferStatus::ReadyToPack);

        let late = simulate_place_order(&mut offer, 10).unwrap();
        assert!(!late.crossed_threshold);
        assert_eq!(offer.aggregated_qty, 70);
    }

    #[test]
    fn test_sealed_offer_rejects_orders() {
        let mut offer = OfferState::new(standard_table(), 50);
        offer.status = OfferStatus::PickedUp;

        assert_eq!(
            simulate_place_order(&mut offer, 10).unwrap_err(),
            AggregationError::NotAcceptingOrders
        );
        assert_eq!(offer.aggregated_qty, 0);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut offer = OfferState::new(standard_table(), 50);
        assert_eq!(
            simulate_place_order(&mut offer, 0).unwrap_err(),
            AggregationError::InvalidQuantity
        );
    }

    #[test]
    fn test_single_order_can_cross_threshold_alone() {
        let mut offer = OfferState::new(standard_table(), 50);

        let order = simulate_place_order(&mut offer, 50).unwrap();
        assert!(order.crossed_threshold);
        assert_eq!(order.unit_price, Decimal::from(90)); // 50 sits in 11-50
        assert_eq!(offer.status, OfferStatus::ReadyToPack);
    }

    #[test]
    fn test_progress_tracks_aggregation() {
        let mut offer = OfferState::new(standard_table(), 50);

        simulate_place_order(&mut offer, 25).unwrap();
        assert_eq!(
            fulfillment_progress(offer.aggregated_qty, offer.min_fulfillment_qty),
            Decimal::from(50)
        );

        simulate_place_order(&mut offer, 100).unwrap();
        assert_eq!(
            fulfillment_progress(offer.aggregated_qty, offer.min_fulfillment_qty),
            Decimal::from(100)
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = i64> {
        1i64..=200
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The aggregated quantity is always the sum of accepted orders
        #[test]
        fn prop_aggregation_is_a_running_sum(
            quantities in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let mut offer = OfferState::new(standard_table(), 50);
            let mut expected = 0i64;

            for qty in &quantities {
                simulate_place_order(&mut offer, *qty).unwrap();
                expected += qty;
                prop_assert_eq!(offer.aggregated_qty, expected);
            }
        }

        /// The threshold crossing fires exactly once per offer, on the order
        /// that first reaches the minimum
        #[test]
        fn prop_threshold_fires_exactly_once(
            min_fulfillment in 1i64..=500,
            quantities in prop::collection::vec(quantity_strategy(), 1..30)
        ) {
            let mut offer = OfferState::new(standard_table(), min_fulfillment);
            let mut crossings = 0usize;

            for qty in &quantities {
                let order = simulate_place_order(&mut offer, *qty).unwrap();
                if order.crossed_threshold {
                    crossings += 1;
                    prop_assert!(offer.aggregated_qty >= min_fulfillment);
                }
            }

            if offer.aggregated_qty >= min_fulfillment {
                prop_assert_eq!(crossings, 1);
                prop_assert_eq!(offer.status, OfferStatus::ReadyToPack);
            } else {
                prop_assert_eq!(crossings, 0);
                prop_assert_eq!(offer.status, OfferStatus::Open);
            }
        }

        /// Later orders always pay a price less than or equal to earlier ones
        /// within the same offer
        #[test]
        fn prop_later_orders_never_pay_more(
            quantities in prop::collection::vec(quantity_strategy(), 2..20)
        ) {
            let mut offer = OfferState::new(standard_table(), 50);
            let mut last_price: Option<Decimal> = None;

            for qty in &quantities {
                let order = simulate_place_order(&mut offer, *qty).unwrap();
                if let Some(prev) = last_price {
                    prop_assert!(order.unit_price <= prev);
                }
                last_price = Some(order.unit_price);
            }
        }

        /// Total amount is always quantity times the snapshotted unit price
        #[test]
        fn prop_total_is_quantity_times_unit_price(
            quantities in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let mut offer = OfferState::new(standard_table(), 50);

            for qty in &quantities {
                let order = simulate_place_order(&mut offer, *qty).unwrap();
                prop_assert_eq!(
                    order.total_amount,
                    order.unit_price * Decimal::from(*qty)
                );
            }
        }

        /// Progress is monotonically non-decreasing and capped at 100
        #[test]
        fn prop_progress_monotone_and_capped(
            min_fulfillment in 1i64..=500,
            quantities in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let mut offer = OfferState::new(standard_table(), min_fulfillment);
            let mut last = Decimal::ZERO;

            for qty in &quantities {
                simulate_place_order(&mut offer, *qty).unwrap();
                let progress =
                    fulfillment_progress(offer.aggregated_qty, offer.min_fulfillment_qty);
                prop_assert!(progress >= last);
                prop_assert!(progress <= Decimal::from(100));
                last = progress;
            }
        }

        /// A rejected placement leaves the offer state untouched
        #[test]
        fn prop_rejected_placement_has_no_effect(qty in quantity_strategy()) {
            let mut offer = OfferState::new(standard_table(), 50);
            offer.status = OfferStatus::Delivered;
            offer.aggregated_qty = 120;

            let before = offer.aggregated_qty;
            prop_assert!(simulate_place_order(&mut offer, qty).is_err());
            prop_assert_eq!(offer.aggregated_qty, before);
            prop_assert_eq!(offer.status, OfferStatus::Delivered);
        }
    }
}
