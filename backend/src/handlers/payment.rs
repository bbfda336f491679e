//! Payment handlers (retailer-facing)

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::payment::{CreatePaymentInput, DisputeInput};
use crate::services::{PaymentService, RetailerService};
use crate::AppState;
use shared::models::Payment;

/// POST /api/v1/payments
pub async fn create_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreatePaymentInput>,
) -> AppResult<Json<Payment>> {
    let retailer = RetailerService::new(state.db.clone())
        .get_by_phone(&user.phone)
        .await?;
    let service = PaymentService::new(state.db.clone());
    Ok(Json(service.create(retailer.id, input).await?))
}

/// GET /api/v1/payments
pub async fn my_payments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Payment>>> {
    let retailer = RetailerService::new(state.db.clone())
        .get_by_phone(&user.phone)
        .await?;
    let service = PaymentService::new(state.db.clone());
    Ok(Json(service.list_for_retailer(retailer.id).await?))
}

/// POST /api/v1/payments/:id/dispute
pub async fn dispute_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(payment_id): Path<Uuid>,
    Json(input): Json<DisputeInput>,
) -> AppResult<Json<Payment>> {
    let retailer = RetailerService::new(state.db.clone())
        .get_by_phone(&user.phone)
        .await?;
    let service = PaymentService::new(state.db.clone());
    Ok(Json(service.dispute(retailer.id, payment_id, input).await?))
}
