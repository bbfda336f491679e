//! Product catalog handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::product::ProductFilter;
use crate::services::ProductService;
use crate::AppState;
use shared::models::Product;

/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.list(filter).await?))
}

/// GET /api/v1/products/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.categories().await?))
}

/// GET /api/v1/products/brands
pub async fn list_brands(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.brands().await?))
}

/// GET /api/v1/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.get(product_id).await?))
}
