//! Validation utilities for the GroupBuy Retail Platform
//!
//! Slab tables are admin-authored input; the lookup code assumes
//! well-formedness, so everything here is enforced at creation time.

use rust_decimal::Decimal;

use crate::models::offer::Slab;

// ============================================================================
// Slab Table Validation
// ============================================================================

/// Validate that a slab table is well-formed:
/// - non-empty, first slab starts at qty >= 1
/// - every slab except the last is bounded; the last is unbounded
/// - ranges are contiguous and non-overlapping (next min = prev max + 1)
/// - all prices are positive and non-increasing across slabs
///   (larger group demand never pays more)
pub fn validate_slab_table(slabs: &[Slab]) -> Result<(), &'static str> {
    if slabs.is_empty() {
        return Err("Slab table must contain at least one slab");
    }
    if slabs[0].min_qty < 1 {
        return Err("Slab minimum quantity must be at least 1");
    }

    for (i, slab) in slabs.iter().enumerate() {
        if slab.unit_price <= Decimal::ZERO {
            return Err("Slab unit price must be positive");
        }

        let is_last = i == slabs.len() - 1;
        match slab.max_qty {
            None if !is_last => return Err("Only the final slab may be unbounded"),
            Some(_) if is_last => return Err("The final slab must be unbounded"),
            Some(max) if max < slab.min_qty => {
                return Err("Slab maximum quantity must not be below its minimum")
            }
            _ => {}
        }

        if let Some(next) = slabs.get(i + 1) {
            // contiguity: no gaps, no overlaps
            let max = slab.max_qty.expect("bounded by the checks above");
            if next.min_qty != max + 1 {
                return Err("Slabs must be contiguous: next min_qty must be prev max_qty + 1");
            }
            if next.unit_price > slab.unit_price {
                return Err("Slab unit prices must not increase with quantity");
            }
        }
    }

    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate an Indian mobile number: 10 digits, optionally prefixed with +91
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 10 && matches!(digits.as_bytes()[0], b'6'..=b'9') {
        return Ok(());
    }
    // +91 prefix
    if digits.len() == 12 && digits.starts_with("91") && matches!(digits.as_bytes()[2], b'6'..=b'9')
    {
        return Ok(());
    }

    Err("Invalid phone number")
}

/// Normalize a phone number to its bare 10-digit form
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 12 && digits.starts_with("91") {
        digits[2..].to_string()
    } else {
        digits
    }
}

/// Validate an OTP code: exactly 6 digits
pub fn validate_otp_format(code: &str) -> Result<(), &'static str> {
    if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("OTP must be 6 digits")
    }
}

/// Validate a supplier code: 2-10 uppercase alphanumeric characters
pub fn validate_supplier_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 {
        return Err("Supplier code must be at least 2 characters");
    }
    if code.len() > 10 {
        return Err("Supplier code must be at most 10 characters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Supplier code must be uppercase alphanumeric only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab(min_qty: i64, max_qty: Option<i64>, unit_price: i64) -> Slab {
        Slab {
            min_qty,
            max_qty,
            unit_price: Decimal::from(unit_price),
        }
    }

    #[test]
    fn well_formed_table_passes() {
        let slabs = vec![
            slab(1, Some(10), 100),
            slab(11, Some(50), 90),
            slab(51, None, 80),
        ];
        assert!(validate_slab_table(&slabs).is_ok());

        // flat pricing across slabs is allowed (non-increasing, not strictly decreasing)
        let flat = vec![slab(1, Some(10), 100), slab(11, None, 100)];
        assert!(validate_slab_table(&flat).is_ok());

        // a single unbounded slab is the minimal valid table
        assert!(validate_slab_table(&[slab(1, None, 42)]).is_ok());
    }

    #[test]
    fn gaps_and_overlaps_are_rejected()  {
        let gap = vec![slab(1, Some(10), 100), slab(12, None, 90)];
        assert!(validate_slab_table(&gap).is_err());

        let overlap = vec![slab(1, Some(10), 100), slab(10, None, 90)];
        assert!(validate_slab_table(&overlap).is_err());
    }

    #[test]
    fn malformed_tables_are_rejected() {
        assert!(validate_slab_table(&[]).is_err());
        // final slab bounded
        assert!(validate_slab_table(&[slab(1, Some(10), 100)]).is_err());
        // unbounded slab in the middle
        let mid = vec![slab(1, None, 100), slab(11, None, 90)];
        assert!(validate_slab_table(&mid).is_err());
        // min above max
        assert!(validate_slab_table(&[slab(10, Some(5), 100), slab(6, None, 90)]).is_err());
        // zero min
        assert!(validate_slab_table(&[slab(0, None, 100)]).is_err());
    }

    #[test]
    fn increasing_prices_are_rejected() {
        let rising = vec![slab(1, Some(10), 80), slab(11, None, 90)];
        assert!(validate_slab_table(&rising).is_err());
    }

    #[test]
    fn non_positive_prices_are_rejected() {
        assert!(validate_slab_table(&[slab(1, None, 0)]).is_err());
        assert!(validate_slab_table(&[slab(1, None, -10)]).is_err());
    }

    #[test]
    fn phone_validation() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("1234567890").is_err()); // invalid leading digit
        assert!(validate_phone("98765").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("+91 98765-43210"), "9876543210");
        assert_eq!(normalize_phone("9876543210"), "9876543210");
    }

    #[test]
    fn otp_format() {
        assert!(validate_otp_format("123456").is_ok());
        assert!(validate_otp_format("12345").is_err());
        assert!(validate_otp_format("12345a").is_err());
    }

    #[test]
    fn supplier_codes() {
        assert!(validate_supplier_code("HUL").is_ok());
        assert!(validate_supplier_code("FORTUNE").is_ok());
        assert!(validate_supplier_code("h").is_err());
        assert!(validate_supplier_code("hul").is_err());
    }
}
