//! Supplier offer models and the quantity-slab aggregation core
//!
//! An offer ties a product + supplier + zone to a slab table and a minimum
//! fulfillment quantity. Retailer orders accumulate into the offer's
//! zone-wide aggregated quantity; crossing the minimum flips the offer from
//! `open` to `ready_to_pack` exactly once.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A quantity range mapped to a unit price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slab {
    pub min_qty: i64,
    /// None means the slab is unbounded above (must be the final slab)
    pub max_qty: Option<i64>,
    pub unit_price: Decimal,
}

impl Slab {
    /// Whether a quantity falls inside this slab's range
    pub fn contains(&self, quantity: i64) -> bool {
        quantity >= self.min_qty && self.max_qty.map_or(true, |max| quantity <= max)
    }
}

/// Ordered sequence of slabs; well-formedness is enforced at offer creation
/// by [`crate::validation::validate_slab_table`]
pub type SlabTable = Vec<Slab>;

/// Lifecycle of a supplier offer
///
/// `open -> ready_to_pack` is owned by the aggregation core; the remaining
/// transitions are admin fulfillment actions and move strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Open,
    ReadyToPack,
    PickedUp,
    OutForDelivery,
    Delivered,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Open => "open",
            OfferStatus::ReadyToPack => "ready_to_pack",
            OfferStatus::PickedUp => "picked_up",
            OfferStatus::OutForDelivery => "out_for_delivery",
            OfferStatus::Delivered => "delivered",
        }
    }

    /// Whether retailers may still place orders against the offer
    ///
    /// Orders stay open through `ready_to_pack` (more demand after the
    /// threshold is welcome); from `picked_up` onward the offer is sealed.
    pub fn accepts_orders(&self) -> bool {
        matches!(self, OfferStatus::Open | OfferStatus::ReadyToPack)
    }

    /// Whether an admin fulfillment action may move the offer to `next`
    ///
    /// Only single forward steps along the pipeline are allowed, and the
    /// pipeline starts at `ready_to_pack` — `open -> ready_to_pack` belongs
    /// to the aggregation core, never to an admin action.
    pub fn can_advance_to(&self, next: OfferStatus) -> bool {
        matches!(
            (self, next),
            (OfferStatus::ReadyToPack, OfferStatus::PickedUp)
                | (OfferStatus::PickedUp, OfferStatus::OutForDelivery)
                | (OfferStatus::OutForDelivery, OfferStatus::Delivered)
        )
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OfferStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(OfferStatus::Open),
            "ready_to_pack" => Ok(OfferStatus::ReadyToPack),
            "picked_up" => Ok(OfferStatus::PickedUp),
            "out_for_delivery" => Ok(OfferStatus::OutForDelivery),
            "delivered" => Ok(OfferStatus::Delivered),
            _ => Err("unknown offer status"),
        }
    }
}

/// A supplier offer for a product within a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierOffer {
    pub id: Uuid,
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub zone_id: Uuid,
    pub quantity_slabs: SlabTable,
    pub min_fulfillment_qty: i64,
    pub lead_time_days: i32,
    /// Running total of all order quantities against this offer
    pub current_aggregated_qty: i64,
    pub status: OfferStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why an order quantity could not be applied to an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("order quantity must be a positive integer")]
    InvalidQuantity,
    #[error("offer is no longer accepting orders")]
    NotAcceptingOrders,
}

/// Result of applying an order quantity to an offer's aggregated state
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOutcome {
    pub new_aggregated_qty: i64,
    pub new_status: OfferStatus,
    /// True only on the call that first reaches the fulfillment threshold
    pub crossed_threshold: bool,
    pub progress_percentage: Decimal,
}

/// Fulfillment progress as a percentage, capped at 100
pub fn fulfillment_progress(aggregated_qty: i64, min_fulfillment_qty: i64) -> Decimal {
    if min_fulfillment_qty <= 0 {
        return Decimal::ZERO;
    }
    let progress =
        Decimal::from(aggregated_qty) * Decimal::from(100) / Decimal::from(min_fulfillment_qty);
    progress.min(Decimal::from(100))
}

/// Apply an order quantity to an offer's aggregated state
///
/// The caller must run this inside whatever serializes concurrent placements
/// per offer (the backend holds a row lock); the function itself is pure.
/// The `open -> ready_to_pack` transition fires on the call that first
/// reaches the threshold and is one-way: once `ready_to_pack`, later orders
/// grow the total but never revert the status.
pub fn apply_order_quantity(
    status: OfferStatus,
    aggregated_qty: i64,
    min_fulfillment_qty: i64,
    quantity: i64,
) -> Result<AggregationOutcome, AggregationError> {
    if quantity <= 0 {
        return Err(AggregationError::InvalidQuantity);
    }
    if !status.accepts_orders() {
        return Err(AggregationError::NotAcceptingOrders);
    }

    let new_aggregated_qty = aggregated_qty + quantity;
    let crossed_threshold =
        status == OfferStatus::Open && new_aggregated_qty >= min_fulfillment_qty;
    let new_status = if crossed_threshold {
        OfferStatus::ReadyToPack
    } else {
        status
    };

    Ok(AggregationOutcome {
        new_aggregated_qty,
        new_status,
        crossed_threshold,
        progress_percentage: fulfillment_progress(new_aggregated_qty, min_fulfillment_qty),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quantity_is_rejected_not_ignored() {
        let err = apply_order_quantity(OfferStatus::Open, 40, 50, 0).unwrap_err();
        assert_eq!(err, AggregationError::InvalidQuantity);
        assert_eq!(
            apply_order_quantity(OfferStatus::Open, 40, 50, -5).unwrap_err(),
            AggregationError::InvalidQuantity
        );
    }

    #[test]
    fn threshold_fires_exactly_once() {
        // 40 + 5 stays open, 45 + 10 crosses
        let first = apply_order_quantity(OfferStatus::Open, 40, 50, 5).unwrap();
        assert_eq!(first.new_status, OfferStatus::Open);
        assert!(!first.crossed_threshold);

        let second =
            apply_order_quantity(first.new_status, first.new_aggregated_qty, 50, 10).unwrap();
        assert_eq!(second.new_status, OfferStatus::ReadyToPack);
        assert!(second.crossed_threshold);
        assert_eq!(second.new_aggregated_qty, 55);

        // further orders never revert the status and never re-fire
        let third =
            apply_order_quantity(second.new_status, second.new_aggregated_qty, 50, 3).unwrap();
        assert_eq!(third.new_status, OfferStatus::ReadyToPack);
        assert!(!third.crossed_threshold);
    }

    #[test]
    fn threshold_fires_regardless_of_arrival_order() {
        // 10 then 5 crosses on the first order instead
        let first = apply_order_quantity(OfferStatus::Open, 40, 50, 10).unwrap();
        assert!(first.crossed_threshold);
        let second =
            apply_order_quantity(first.new_status, first.new_aggregated_qty, 50, 5).unwrap();
        assert!(!second.crossed_threshold);
        assert_eq!(second.new_aggregated_qty, 55);
    }

    #[test]
    fn sealed_offers_reject_orders() {
        for status in [
            OfferStatus::PickedUp,
            OfferStatus::OutForDelivery,
            OfferStatus::Delivered,
        ] {
            assert_eq!(
                apply_order_quantity(status, 100, 50, 10).unwrap_err(),
                AggregationError::NotAcceptingOrders
            );
        }
    }

    #[test]
    fn progress_is_capped_at_100() {
        assert_eq!(fulfillment_progress(25, 50), Decimal::from(50));
        assert_eq!(fulfillment_progress(50, 50), Decimal::from(100));
        assert_eq!(fulfillment_progress(120, 50), Decimal::from(100));
        assert_eq!(fulfillment_progress(10, 0), Decimal::ZERO);
    }

    #[test]
    fn admin_advance_is_strictly_forward() {
        assert!(OfferStatus::ReadyToPack.can_advance_to(OfferStatus::PickedUp));
        assert!(OfferStatus::PickedUp.can_advance_to(OfferStatus::OutForDelivery));
        assert!(OfferStatus::OutForDelivery.can_advance_to(OfferStatus::Delivered));

        // no skips, no backward moves, no admin path out of open
        assert!(!OfferStatus::ReadyToPack.can_advance_to(OfferStatus::OutForDelivery));
        assert!(!OfferStatus::PickedUp.can_advance_to(OfferStatus::ReadyToPack));
        assert!(!OfferStatus::Open.can_advance_to(OfferStatus::ReadyToPack));
        assert!(!OfferStatus::Delivered.can_advance_to(OfferStatus::Delivered));
    }
}
