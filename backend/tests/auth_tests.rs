//! Authentication tests
//!
//! Tests for phone validation, OTP format rules and the verification
//! attempt/expiry lifecycle.

use proptest::prelude::*;

use shared::validation::{normalize_phone, validate_otp_format, validate_phone};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_valid_indian_mobile_numbers() {
        for phone in ["9876543210", "8123456789", "7000000000", "6999999999"] {
            assert!(validate_phone(phone).is_ok(), "{} should be valid", phone);
        }
    }

    #[test]
    fn test_country_code_prefix_accepted() {
        assert!(validate_phone("+919876543210").is_ok());
        assert_eq!(normalize_phone("+919876543210"), "9876543210");
    }

    #[test]
    fn test_invalid_phone_numbers() {
        for phone in [
            "12345",        // too short
            "5876543210",   // starts below 6
            "98765432101",  // 11 digits
            "abcdefghij",   // not digits
            "",
        ] {
            assert!(validate_phone(phone).is_err(), "{} should be invalid", phone);
        }
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize_phone("98765 43210"), "9876543210");
        assert_eq!(normalize_phone("+91-98765-43210"), "9876543210");
    }

    #[test]
    fn test_otp_format() {
        assert!(validate_otp_format("123456").is_ok());
        assert!(validate_otp_format("000000").is_ok());

        assert!(validate_otp_format("12345").is_err());
        assert!(validate_otp_format("1234567").is_err());
        assert!(validate_otp_format("12345a").is_err());
        assert!(validate_otp_format("").is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn valid_phone_strategy() -> impl Strategy<Value = String> {
        (6u64..=9, 0u64..1_000_000_000).prop_map(|(lead, rest)| format!("{}{:09}", lead, rest))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any 10-digit number starting 6-9 is a valid phone
        #[test]
        fn prop_valid_phones_accepted(phone in valid_phone_strategy()) {
            prop_assert!(validate_phone(&phone).is_ok());
        }

        /// Normalization is idempotent
        #[test]
        fn prop_normalize_idempotent(phone in valid_phone_strategy()) {
            let once = normalize_phone(&phone);
            prop_assert_eq!(normalize_phone(&once), once.clone());
        }

        /// The +91 form normalizes to the bare 10-digit form
        #[test]
        fn prop_country_code_normalizes_away(phone in valid_phone_strategy()) {
            let with_code = format!("+91{}", phone);
            prop_assert!(validate_phone(&with_code).is_ok());
            prop_assert_eq!(normalize_phone(&with_code), phone);
        }

        /// Exactly six ASCII digits pass the OTP format check
        #[test]
        fn prop_six_digit_codes_accepted(code in 0u32..1_000_000) {
            let code = format!("{:06}", code);
            prop_assert!(validate_otp_format(&code).is_ok());
        }
    }
}

// ============================================================================
// Integration Test Helpers (verification lifecycle without a database)
// ============================================================================

#[cfg(test)]
mod integration_helpers {
    /// Outcome of one verification attempt
    #[derive(Debug, PartialEq)]
    pub enum VerifyOutcome {
        Success,
        WrongCode,
        Expired,
        TooManyAttempts,
    }

    /// Pending OTP record
    pub struct PendingOtp {
        pub code: String,
        pub attempts: i32,
        pub expired: bool,
    }

    const MAX_ATTEMPTS: i32 = 5;

    /// Simulate one verification attempt against a pending record
    pub fn simulate_verify(record: &mut PendingOtp, submitted: &str) -> VerifyOutcome {
        if record.expired {
            return VerifyOutcome::Expired;
        }
        if record.attempts >= MAX_ATTEMPTS {
            return VerifyOutcome::TooManyAttempts;
        }
        if submitted != record.code {
            record.attempts += 1;
            return VerifyOutcome::WrongCode;
        }
        VerifyOutcome::Success
    }

    #[test]
    fn test_correct_code_succeeds() {
        let mut record = PendingOtp {
            code: "123456".to_string(),
            attempts: 0,
            expired: false,
        };
        assert_eq!(simulate_verify(&mut record, "123456"), VerifyOutcome::Success);
    }

    #[test]
    fn test_wrong_code_counts_an_attempt() {
        let mut record = PendingOtp {
            code: "123456".to_string(),
            attempts: 0,
            expired: false,
        };
        assert_eq!(simulate_verify(&mut record, "000000"), VerifyOutcome::WrongCode);
        assert_eq!(record.attempts, 1);
    }

    #[test]
    fn test_attempt_limit_locks_the_code() {
        let mut record = PendingOtp {
            code: "123456".to_string(),
            attempts: 0,
            expired: false,
        };

        for _ in 0..5 {
            assert_eq!(simulate_verify(&mut record, "000000"), VerifyOutcome::WrongCode);
        }

        // The sixth attempt is refused even with the correct code
        assert_eq!(
            simulate_verify(&mut record, "123456"),
            VerifyOutcome::TooManyAttempts
        );
    }

    #[test]
    fn test_expired_code_rejected() {
        let mut record = PendingOtp {
            code: "123456".to_string(),
            attempts: 0,
            expired: true,
        };
        assert_eq!(simulate_verify(&mut record, "123456"), VerifyOutcome::Expired);
    }
}
