//! Slab pricing resolver
//!
//! Pure lookups over a slab table: the unit price and slab index for a given
//! aggregated quantity, and the "order N more to save X per unit" preview the
//! client shows retailers. No I/O, no state.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::offer::Slab;

/// Why a price lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("quantity must be a positive integer")]
    InvalidQuantity,
    #[error("slab table is empty")]
    EmptySlabTable,
}

/// Preview of the next (cheaper) slab relative to a quantity
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NextSlab {
    pub next_price: Decimal,
    /// Additional units needed to enter the next slab
    pub qty_needed: i64,
    /// Current unit price minus the next slab's unit price
    pub per_unit_savings: Decimal,
}

/// Index of the slab containing `quantity`
///
/// Tables validated at creation are contiguous, so a miss can only happen
/// when the table starts above the quantity; the first slab is used as the
/// fallback in that case, matching the marketplace's historical behavior.
pub fn slab_index_for(slabs: &[Slab], quantity: i64) -> Result<usize, PricingError> {
    if quantity < 1 {
        return Err(PricingError::InvalidQuantity);
    }
    if slabs.is_empty() {
        return Err(PricingError::EmptySlabTable);
    }
    Ok(slabs
        .iter()
        .position(|slab| slab.contains(quantity))
        .unwrap_or(0))
}

/// Unit price for `quantity`
pub fn unit_price_for(slabs: &[Slab], quantity: i64) -> Result<Decimal, PricingError> {
    slab_index_for(slabs, quantity).map(|idx| slabs[idx].unit_price)
}

/// The next-slab incentive for `quantity`, or None when the quantity already
/// sits in the final (unbounded) slab
pub fn next_slab_preview(slabs: &[Slab], quantity: i64) -> Result<Option<NextSlab>, PricingError> {
    let idx = slab_index_for(slabs, quantity)?;
    let current = &slabs[idx];
    let Some(next) = slabs.get(idx + 1) else {
        return Ok(None);
    };

    Ok(Some(NextSlab {
        next_price: next.unit_price,
        qty_needed: next.min_qty - quantity,
        per_unit_savings: current.unit_price - next.unit_price,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn slab(min_qty: i64, max_qty: Option<i64>, unit_price: i64) -> Slab {
        Slab {
            min_qty,
            max_qty,
            unit_price: Decimal::from(unit_price),
        }
    }

    fn table() -> Vec<Slab> {
        vec![
            slab(1, Some(10), 100),
            slab(11, Some(50), 90),
            slab(51, None, 80),
        ]
    }

    #[test]
    fn unit_price_matches_the_containing_slab() {
        let slabs = table();
        assert_eq!(unit_price_for(&slabs, 1).unwrap(), Decimal::from(100));
        assert_eq!(unit_price_for(&slabs, 10).unwrap(), Decimal::from(100));
        assert_eq!(unit_price_for(&slabs, 11).unwrap(), Decimal::from(90));
        assert_eq!(unit_price_for(&slabs, 50).unwrap(), Decimal::from(90));
        assert_eq!(unit_price_for(&slabs, 51).unwrap(), Decimal::from(80));
        assert_eq!(unit_price_for(&slabs, 100_000).unwrap(), Decimal::from(80));
    }

    #[test]
    fn invalid_quantities_are_rejected() {
        let slabs = table();
        assert_eq!(
            unit_price_for(&slabs, 0).unwrap_err(),
            PricingError::InvalidQuantity
        );
        assert_eq!(
            unit_price_for(&slabs, -5).unwrap_err(),
            PricingError::InvalidQuantity
        );
        assert_eq!(
            unit_price_for(&[], 10).unwrap_err(),
            PricingError::EmptySlabTable
        );
    }

    #[test]
    fn slab_index_tracks_the_tier() {
        let slabs = table();
        assert_eq!(slab_index_for(&slabs, 5).unwrap(), 0);
        assert_eq!(slab_index_for(&slabs, 30).unwrap(), 1);
        assert_eq!(slab_index_for(&slabs, 500).unwrap(), 2);
    }

    #[test]
    fn table_starting_above_one_falls_back_to_first_slab() {
        let slabs = vec![slab(10, Some(50), 90), slab(51, None, 80)];
        assert_eq!(slab_index_for(&slabs, 3).unwrap(), 0);
        assert_eq!(unit_price_for(&slabs, 3).unwrap(), Decimal::from(90));
    }

    #[test]
    fn next_slab_preview_points_at_the_cheaper_tier() {
        let slabs = table();
        let preview = next_slab_preview(&slabs, 7).unwrap().unwrap();
        assert_eq!(preview.next_price, Decimal::from(90));
        assert_eq!(preview.qty_needed, 4); // 11 - 7
        assert_eq!(preview.per_unit_savings, Decimal::from(10));

        let preview = next_slab_preview(&slabs, 50).unwrap().unwrap();
        assert_eq!(preview.qty_needed, 1);
        assert_eq!(preview.per_unit_savings, Decimal::from(10));
    }

    #[test]
    fn final_slab_has_no_preview() {
        let slabs = table();
        assert!(next_slab_preview(&slabs, 51).unwrap().is_none());
        assert!(next_slab_preview(&slabs, 9999).unwrap().is_none());
    }
}
