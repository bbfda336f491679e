//! Payment models
//!
//! Payments are locked in escrow for 48 hours after creation; within that
//! window the retailer may raise a dispute, otherwise an admin releases the
//! amount to the supplier.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hours a payment stays locked before it is eligible for release
pub const PAYMENT_LOCK_HOURS: i64 = 48;

/// How the retailer paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Upi,
    BankTransfer,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Upi => "upi",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cheque => "cheque",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "upi" => Ok(PaymentMethod::Upi),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "cheque" => Ok(PaymentMethod::Cheque),
            _ => Err("unknown payment method"),
        }
    }
}

/// Escrow state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Locked,
    Released,
    Disputed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Locked => "locked",
            PaymentStatus::Released => "released",
            PaymentStatus::Disputed => "disputed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    /// Allowed transitions: locked -> released | disputed,
    /// disputed -> released | refunded. Released/refunded are terminal.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Locked, PaymentStatus::Released)
                | (PaymentStatus::Locked, PaymentStatus::Disputed)
                | (PaymentStatus::Disputed, PaymentStatus::Released)
                | (PaymentStatus::Disputed, PaymentStatus::Refunded)
        )
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "locked" => Ok(PaymentStatus::Locked),
            "released" => Ok(PaymentStatus::Released),
            "disputed" => Ok(PaymentStatus::Disputed),
            "refunded" => Ok(PaymentStatus::Refunded),
            _ => Err("unknown payment status"),
        }
    }
}

/// A payment against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub retailer_id: Uuid,
    pub retailer_name: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub status: PaymentStatus,
    pub lock_expires_at: DateTime<Utc>,
    pub dispute_reason: Option<String>,
    pub dispute_raised_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// When a payment created at `created_at` becomes eligible for release
pub fn lock_expiry(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::hours(PAYMENT_LOCK_HOURS)
}
