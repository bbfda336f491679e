//! Supplier handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::SupplierService;
use crate::AppState;
use shared::models::Supplier;

/// GET /api/v1/suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db.clone());
    Ok(Json(service.list_active().await?))
}

/// GET /api/v1/suppliers/:id
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db.clone());
    Ok(Json(service.get(supplier_id).await?))
}
