//! Payment escrow service
//!
//! A payment is recorded against a delivered order and locked for 48 hours.
//! Within the window the retailer may dispute; otherwise an admin releases
//! the amount to the supplier. Disputes resolve to released or refunded.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{lock_expiry, Payment, PaymentMethod, PaymentStatus};

/// Payment service
#[derive(Clone)]
pub struct PaymentService {
    db: PgPool,
}

/// Input for recording a payment
#[derive(Debug, Deserialize)]
pub struct CreatePaymentInput {
    pub order_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

/// Input for raising a dispute
#[derive(Debug, Deserialize)]
pub struct DisputeInput {
    pub reason: String,
}

/// Database row for a payment
#[derive(Debug, FromRow)]
struct PaymentRow {
    id: Uuid,
    order_id: Uuid,
    retailer_id: Uuid,
    retailer_name: String,
    supplier_id: Uuid,
    supplier_name: String,
    amount: Decimal,
    payment_method: String,
    reference_number: Option<String>,
    notes: Option<String>,
    status: String,
    lock_expires_at: DateTime<Utc>,
    dispute_reason: Option<String>,
    dispute_raised_at: Option<DateTime<Utc>>,
    released_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let payment_method = row.payment_method.parse::<PaymentMethod>().map_err(|_| {
            AppError::Internal(format!(
                "Unknown payment method in database: {}",
                row.payment_method
            ))
        })?;
        let status = row.status.parse::<PaymentStatus>().map_err(|_| {
            AppError::Internal(format!("Unknown payment status in database: {}", row.status))
        })?;

        Ok(Payment {
            id: row.id,
            order_id: row.order_id,
            retailer_id: row.retailer_id,
            retailer_name: row.retailer_name,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            amount: row.amount,
            payment_method,
            reference_number: row.reference_number,
            notes: row.notes,
            status,
            lock_expires_at: row.lock_expires_at,
            dispute_reason: row.dispute_reason,
            dispute_raised_at: row.dispute_raised_at,
            released_at: row.released_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PAYMENT_COLUMNS: &str = "id, order_id, retailer_id, retailer_name, supplier_id, \
                               supplier_name, amount, payment_method, reference_number, notes, \
                               status, lock_expires_at, dispute_reason, dispute_raised_at, \
                               released_at, created_at, updated_at";

/// Order fields the payment snapshot needs
#[derive(Debug, FromRow)]
struct OrderSnapshotRow {
    retailer_id: Uuid,
    retailer_name: String,
    supplier_id: Uuid,
    supplier_name: String,
    total_amount: Decimal,
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a locked payment against the retailer's own order
    pub async fn create(
        &self,
        retailer_id: Uuid,
        input: CreatePaymentInput,
    ) -> AppResult<Payment> {
        let order = sqlx::query_as::<_, OrderSnapshotRow>(
            "SELECT retailer_id, retailer_name, supplier_id, supplier_name, total_amount \
             FROM orders WHERE id = $1",
        )
        .bind(input.order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        if order.retailer_id != retailer_id {
            return Err(AppError::NotFound("Order".to_string()));
        }

        if input.amount != order.total_amount {
            return Err(AppError::Validation {
                field: "amount".to_string(),
                message: format!(
                    "Payment amount must equal the order total of {}",
                    order.total_amount
                ),
                message_hi: "भुगतान राशि ऑर्डर की कुल राशि के बराबर होनी चाहिए".to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments WHERE order_id = $1 AND status != 'refunded'",
        )
        .bind(input.order_id)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("payment for this order".to_string()));
        }

        let now = Utc::now();
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            INSERT INTO payments
                (order_id, retailer_id, retailer_name, supplier_id, supplier_name,
                 amount, payment_method, reference_number, notes, lock_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PAYMENT_COLUMNS}
            "#,
        ))
        .bind(input.order_id)
        .bind(order.retailer_id)
        .bind(&order.retailer_name)
        .bind(order.supplier_id)
        .bind(&order.supplier_name)
        .bind(input.amount)
        .bind(input.payment_method.as_str())
        .bind(&input.reference_number)
        .bind(&input.notes)
        .bind(lock_expiry(now))
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// A retailer's payments, newest first
    pub async fn list_for_retailer(&self, retailer_id: Uuid) -> AppResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE retailer_id = $1 ORDER BY created_at DESC",
        ))
        .bind(retailer_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    /// All payments, optionally by status (admin)
    pub async fn list_all(&self, status: Option<String>) -> AppResult<Vec<Payment>> {
        if let Some(raw) = &status {
            raw.parse::<PaymentStatus>().map_err(|_| AppError::Validation {
                field: "status".to_string(),
                message: format!("Unknown payment status: {}", raw),
                message_hi: "भुगतान स्थिति मान्य नहीं है".to_string(),
            })?;
        }

        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC",
        ))
        .bind(&status)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    /// Raise a dispute on a locked payment within the escrow window
    pub async fn dispute(
        &self,
        retailer_id: Uuid,
        payment_id: Uuid,
        input: DisputeInput,
    ) -> AppResult<Payment> {
        if input.reason.trim().is_empty() {
            return Err(AppError::Validation {
                field: "reason".to_string(),
                message: "A dispute reason is required".to_string(),
                message_hi: "विवाद का कारण आवश्यक है".to_string(),
            });
        }

        let payment = self.get(payment_id).await?;
        if payment.retailer_id != retailer_id {
            return Err(AppError::NotFound("Payment".to_string()));
        }

        if !payment.status.can_transition_to(PaymentStatus::Disputed) {
            return Err(AppError::InvalidStateTransition(format!(
                "Payment is {} and cannot be disputed",
                payment.status.as_str()
            )));
        }

        if Utc::now() > payment.lock_expires_at {
            return Err(AppError::InvalidStateTransition(
                "The dispute window has closed".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "UPDATE payments \
             SET status = 'disputed', dispute_reason = $1, dispute_raised_at = NOW(), \
                 updated_at = NOW() \
             WHERE id = $2 RETURNING {PAYMENT_COLUMNS}",
        ))
        .bind(input.reason.trim())
        .bind(payment_id)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// Release a payment to the supplier (admin)
    pub async fn release(&self, payment_id: Uuid) -> AppResult<Payment> {
        self.transition(payment_id, PaymentStatus::Released).await
    }

    /// Refund a disputed payment to the retailer (admin)
    pub async fn refund(&self, payment_id: Uuid) -> AppResult<Payment> {
        self.transition(payment_id, PaymentStatus::Refunded).await
    }

    async fn transition(&self, payment_id: Uuid, next: PaymentStatus) -> AppResult<Payment> {
        let payment = self.get(payment_id).await?;

        if !payment.status.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "Payment cannot move from {} to {}",
                payment.status.as_str(),
                next.as_str()
            )));
        }

        let released_clause = if next == PaymentStatus::Released {
            ", released_at = NOW()"
        } else {
            ""
        };

        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "UPDATE payments SET status = $1, updated_at = NOW(){released_clause} \
             WHERE id = $2 RETURNING {PAYMENT_COLUMNS}",
        ))
        .bind(next.as_str())
        .bind(payment_id)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    async fn get(&self, payment_id: Uuid) -> AppResult<Payment> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1",
        ))
        .bind(payment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment".to_string()))?;

        row.try_into()
    }
}
