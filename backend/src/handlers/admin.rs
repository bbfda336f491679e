//! Admin handlers: catalog management, offer fulfillment, payment resolution
//! and development seed data

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AdminUser;
use crate::services::offer::{CreateOfferInput, OfferFilter, OfferView, UpdateOfferInput};
use crate::services::product::{CreateProductInput, UpdateProductInput};
use crate::services::supplier::CreateSupplierInput;
use crate::services::zone::CreateZoneInput;
use crate::services::{
    OfferService, OrderService, PaymentService, ProductService, RetailerService, SupplierService,
    ZoneService,
};
use crate::AppState;
use shared::models::{
    Order, OrderStatus, OfferStatus, Payment, Product, Retailer, Supplier, SupplierOffer, Zone,
};

/// Target status for a fulfillment advance
#[derive(Debug, Deserialize)]
pub struct AdvanceInput {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub status: Option<String>,
}

// Retailers

/// GET /api/v1/admin/retailers
pub async fn list_retailers(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<Retailer>>> {
    Ok(Json(RetailerService::new(state.db.clone()).list_all().await?))
}

// Zones

/// POST /api/v1/admin/zones
pub async fn create_zone(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(input): Json<CreateZoneInput>,
) -> AppResult<Json<Zone>> {
    Ok(Json(ZoneService::new(state.db.clone()).create(input).await?))
}

// Suppliers

/// POST /api/v1/admin/suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    Ok(Json(SupplierService::new(state.db.clone()).create(input).await?))
}

// Products

/// POST /api/v1/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    Ok(Json(ProductService::new(state.db.clone()).create(input).await?))
}

/// PUT /api/v1/admin/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    Ok(Json(
        ProductService::new(state.db.clone())
            .update(product_id, input)
            .await?,
    ))
}

/// DELETE /api/v1/admin/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    ProductService::new(state.db.clone())
        .deactivate(product_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// Offers

/// POST /api/v1/admin/offers
pub async fn create_offer(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(input): Json<CreateOfferInput>,
) -> AppResult<Json<SupplierOffer>> {
    Ok(Json(OfferService::new(state.db.clone()).create(input).await?))
}

/// GET /api/v1/admin/offers
pub async fn list_offers(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<OfferFilter>,
) -> AppResult<Json<Vec<OfferView>>> {
    Ok(Json(OfferService::new(state.db.clone()).list_all(filter).await?))
}

/// PUT /api/v1/admin/offers/:id
pub async fn update_offer(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(offer_id): Path<Uuid>,
    Json(input): Json<UpdateOfferInput>,
) -> AppResult<Json<SupplierOffer>> {
    Ok(Json(
        OfferService::new(state.db.clone())
            .update(offer_id, input)
            .await?,
    ))
}

/// POST /api/v1/admin/offers/:id/advance
pub async fn advance_offer(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(offer_id): Path<Uuid>,
    Json(input): Json<AdvanceInput>,
) -> AppResult<Json<SupplierOffer>> {
    let next = input.status.parse::<OfferStatus>().map_err(|_| {
        AppError::Validation {
            field: "status".to_string(),
            message: format!("Unknown offer status: {}", input.status),
            message_hi: "ऑफ़र स्थिति मान्य नहीं है".to_string(),
        }
    })?;
    Ok(Json(
        OfferService::new(state.db.clone())
            .advance_status(offer_id, next)
            .await?,
    ))
}

/// GET /api/v1/admin/offers/:id/orders
pub async fn list_offer_orders(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(offer_id): Path<Uuid>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(
        OrderService::new(state.db.clone())
            .list_for_offer(offer_id)
            .await?,
    ))
}

/// GET /api/v1/admin/offers/:id/orders/export
///
/// Order sheet as CSV for handing to the supplier.
pub async fn export_offer_orders(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(offer_id): Path<Uuid>,
) -> AppResult<Response> {
    let csv = OrderService::new(state.db.clone())
        .export_offer_csv(offer_id)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"order-sheet.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

// Orders

/// POST /api/v1/admin/orders/:id/advance
pub async fn advance_order(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<AdvanceInput>,
) -> AppResult<Json<Order>> {
    let next = input.status.parse::<OrderStatus>().map_err(|_| {
        AppError::Validation {
            field: "status".to_string(),
            message: format!("Unknown order status: {}", input.status),
            message_hi: "ऑर्डर स्थिति मान्य नहीं है".to_string(),
        }
    })?;
    Ok(Json(
        OrderService::new(state.db.clone())
            .advance_status(order_id, next)
            .await?,
    ))
}

// Payments

/// GET /api/v1/admin/payments
pub async fn list_payments(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<PaymentListQuery>,
) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(
        PaymentService::new(state.db.clone())
            .list_all(query.status)
            .await?,
    ))
}

/// POST /api/v1/admin/payments/:id/release
pub async fn release_payment(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    Ok(Json(PaymentService::new(state.db.clone()).release(payment_id).await?))
}

/// POST /api/v1/admin/payments/:id/refund
pub async fn refund_payment(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    Ok(Json(PaymentService::new(state.db.clone()).refund(payment_id).await?))
}

// Seed

/// POST /api/v1/admin/seed
///
/// Idempotent development seed: the big FMCG suppliers and a small catalog.
pub async fn seed(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<serde_json::Value>> {
    let suppliers: [(&str, &str, &str); 3] = [
        ("Hindustan Unilever", "HUL", "Personal care and home care distributor"),
        ("ITC Limited", "ITC", "Foods and FMCG distributor"),
        ("Fortune (Adani Wilmar)", "FORTUNE", "Edible oils and staples"),
    ];

    for (name, code, description) in suppliers {
        sqlx::query(
            "INSERT INTO suppliers (name, code, description) VALUES ($1, $2, $3) \
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(name)
        .bind(code)
        .bind(description)
        .execute(&state.db)
        .await?;
    }

    let products: [(&str, &str, &str, &str); 6] = [
        ("Surf Excel Easy Wash 1kg", "Surf Excel", "pack", "Home Care"),
        ("Lifebuoy Soap 125g", "Lifebuoy", "piece", "Personal Care"),
        ("Aashirvaad Atta 10kg", "Aashirvaad", "bag", "Staples"),
        ("Sunfeast Marie Light 1kg", "Sunfeast", "pack", "Snacks"),
        ("Fortune Sunflower Oil 1L", "Fortune", "bottle", "Edible Oils"),
        ("Fortune Besan 500g", "Fortune", "pack", "Staples"),
    ];

    for (name, brand, unit, category) in products {
        sqlx::query(
            "INSERT INTO products (name, brand, unit, category) \
             SELECT $1, $2, $3, $4 \
             WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $1 AND brand = $2)",
        )
        .bind(name)
        .bind(brand)
        .bind(unit)
        .bind(category)
        .execute(&state.db)
        .await?;
    }

    tracing::info!("Seed data applied");

    Ok(Json(serde_json::json!({
        "success": true,
        "suppliers": suppliers.len(),
        "products": products.len(),
    })))
}
