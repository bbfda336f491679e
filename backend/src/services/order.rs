//! Order placement and fulfillment service
//!
//! `place_order` is the hot path: a single transaction takes a row lock on
//! the offer, prices the order at the prospective zone-wide quantity, flips
//! the offer to `ready_to_pack` when the threshold is first reached, and
//! inserts the order with its price snapshot. Concurrent placements against
//! the same offer serialize on the lock, so two orders can never both read
//! the same aggregated quantity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{
    apply_order_quantity, fulfillment_progress, AggregationError, Order, OrderStatus, OfferStatus,
    SlabTable,
};
use shared::pricing::unit_price_for;

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Input for placing an order
#[derive(Debug, Deserialize)]
pub struct PlaceOrderInput {
    pub offer_id: Uuid,
    pub quantity: i64,
}

/// Everything the client needs to render the confirmation screen
#[derive(Debug, Serialize)]
pub struct PlacementSummary {
    pub order: Order,
    pub new_aggregated_qty: i64,
    pub offer_status: OfferStatus,
    /// True when this order pushed the zone across the fulfillment threshold
    pub crossed_threshold: bool,
    pub progress_percentage: Decimal,
}

/// Retailer order with the live state of its offer alongside
#[derive(Debug, Serialize)]
pub struct OrderWithProgress {
    #[serde(flatten)]
    pub order: Order,
    pub offer_status: OfferStatus,
    pub offer_aggregated_qty: i64,
    pub offer_progress_percentage: Decimal,
}

/// Locked offer state read inside the placement transaction
#[derive(Debug, FromRow)]
struct LockedOfferRow {
    product_id: Uuid,
    supplier_id: Uuid,
    zone_id: Uuid,
    quantity_slabs: Json<SlabTable>,
    min_fulfillment_qty: i64,
    current_aggregated_qty: i64,
    status: String,
}

/// Database row for an order
#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    offer_id: Uuid,
    retailer_id: Uuid,
    retailer_name: String,
    zone_id: Uuid,
    product_id: Uuid,
    product_name: String,
    product_brand: String,
    product_unit: String,
    supplier_id: Uuid,
    supplier_name: String,
    supplier_code: String,
    quantity: i64,
    unit_price: Decimal,
    total_amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<OrderStatus>().map_err(|_| {
            AppError::Internal(format!("Unknown order status in database: {}", row.status))
        })?;

        Ok(Order {
            id: row.id,
            offer_id: row.offer_id,
            retailer_id: row.retailer_id,
            retailer_name: row.retailer_name,
            zone_id: row.zone_id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_brand: row.product_brand,
            product_unit: row.product_unit,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            supplier_code: row.supplier_code,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_amount: row.total_amount,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, offer_id, retailer_id, retailer_name, zone_id, product_id, \
                             product_name, product_brand, product_unit, supplier_id, \
                             supplier_name, supplier_code, quantity, unit_price, total_amount, \
                             status, created_at, updated_at";

/// Serialization failures surface as retryable conflicts
fn map_placement_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(code) = db_err.code() {
            if code == "40001" || code == "40P01" {
                return AppError::ConcurrentUpdateConflict;
            }
        }
    }
    AppError::DatabaseError(err)
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Place an order against an offer for a registered retailer
    pub async fn place_order(
        &self,
        retailer_id: Uuid,
        input: PlaceOrderInput,
    ) -> AppResult<PlacementSummary> {
        if input.quantity <= 0 {
            return Err(AppError::InvalidQuantity(
                "Order quantity must be a positive integer".to_string(),
            ));
        }

        let mut tx = self.db.begin().await.map_err(map_placement_error)?;

        // Lock the offer row; concurrent placements queue here
        let offer = sqlx::query_as::<_, LockedOfferRow>(
            r#"
            SELECT product_id, supplier_id, zone_id, quantity_slabs,
                   min_fulfillment_qty, current_aggregated_qty, status
            FROM supplier_offers
            WHERE id = $1 AND is_active = true
            FOR UPDATE
            "#,
        )
        .bind(input.offer_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_placement_error)?
        .ok_or_else(|| AppError::NotFound("Offer".to_string()))?;

        let status = offer.status.parse::<OfferStatus>().map_err(|_| {
            AppError::Internal(format!("Unknown offer status in database: {}", offer.status))
        })?;

        let outcome = apply_order_quantity(
            status,
            offer.current_aggregated_qty,
            offer.min_fulfillment_qty,
            input.quantity,
        )
        .map_err(|err| match err {
            AggregationError::InvalidQuantity => {
                AppError::InvalidQuantity("Order quantity must be a positive integer".to_string())
            }
            AggregationError::NotAcceptingOrders => AppError::OfferNotOpenForOrders(format!(
                "Offer is {} and no longer accepting orders",
                status
            )),
        })?;

        // Price at the prospective zone-wide quantity, including this order
        let unit_price = unit_price_for(&offer.quantity_slabs.0, outcome.new_aggregated_qty)
            .map_err(|err| AppError::Internal(format!("Slab lookup failed: {}", err)))?;
        let total_amount = unit_price * Decimal::from(input.quantity);

        sqlx::query(
            "UPDATE supplier_offers \
             SET current_aggregated_qty = $1, status = $2, updated_at = NOW() \
             WHERE id = $3",
        )
        .bind(outcome.new_aggregated_qty)
        .bind(outcome.new_status.as_str())
        .bind(input.offer_id)
        .execute(&mut *tx)
        .await
        .map_err(map_placement_error)?;

        let order_status = if outcome.new_status == OfferStatus::ReadyToPack {
            OrderStatus::ReadyToPack
        } else {
            OrderStatus::Pending
        };

        if outcome.crossed_threshold {
            // Earlier pending orders in the zone move with the offer
            sqlx::query(
                "UPDATE orders SET status = 'ready_to_pack', updated_at = NOW() \
                 WHERE offer_id = $1 AND status = 'pending'",
            )
            .bind(input.offer_id)
            .execute(&mut *tx)
            .await
            .map_err(map_placement_error)?;
        }

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders
                (offer_id, retailer_id, retailer_name, zone_id, product_id, product_name,
                 product_brand, product_unit, supplier_id, supplier_name, supplier_code,
                 quantity, unit_price, total_amount, status)
            SELECT $1, r.id, r.shop_name, $2, p.id, p.name, p.brand, p.unit,
                   s.id, s.name, s.code, $3, $4, $5, $6
            FROM retailers r, products p, suppliers s
            WHERE r.id = $7 AND p.id = $8 AND s.id = $9
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(input.offer_id)
        .bind(offer.zone_id)
        .bind(input.quantity)
        .bind(unit_price)
        .bind(total_amount)
        .bind(order_status.as_str())
        .bind(retailer_id)
        .bind(offer.product_id)
        .bind(offer.supplier_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_placement_error)?
        .ok_or_else(|| AppError::NotFound("Retailer".to_string()))?;

        tx.commit().await.map_err(map_placement_error)?;

        if outcome.crossed_threshold {
            tracing::info!(
                "Offer {} reached its fulfillment threshold at {} units",
                input.offer_id,
                outcome.new_aggregated_qty
            );
        }

        Ok(PlacementSummary {
            order: order_row.try_into()?,
            new_aggregated_qty: outcome.new_aggregated_qty,
            offer_status: outcome.new_status,
            crossed_threshold: outcome.crossed_threshold,
            progress_percentage: outcome.progress_percentage,
        })
    }

    /// A retailer's orders, newest first, with live offer progress
    pub async fn list_for_retailer(&self, retailer_id: Uuid) -> AppResult<Vec<OrderWithProgress>> {
        let rows = sqlx::query_as::<_, OrderProgressRow>(&format!(
            r#"
            SELECT {prefixed}, so.status AS offer_status,
                   so.current_aggregated_qty AS offer_aggregated_qty,
                   so.min_fulfillment_qty AS offer_min_fulfillment_qty
            FROM orders o
            JOIN supplier_offers so ON so.id = o.offer_id
            WHERE o.retailer_id = $1
            ORDER BY o.created_at DESC
            "#,
            prefixed = prefixed_order_columns(),
        ))
        .bind(retailer_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(OrderWithProgress::try_from).collect()
    }

    /// A single order, restricted to its owning retailer
    pub async fn get_for_retailer(
        &self,
        retailer_id: Uuid,
        order_id: Uuid,
    ) -> AppResult<OrderWithProgress> {
        let row = sqlx::query_as::<_, OrderProgressRow>(&format!(
            r#"
            SELECT {prefixed}, so.status AS offer_status,
                   so.current_aggregated_qty AS offer_aggregated_qty,
                   so.min_fulfillment_qty AS offer_min_fulfillment_qty
            FROM orders o
            JOIN supplier_offers so ON so.id = o.offer_id
            WHERE o.id = $1 AND o.retailer_id = $2
            "#,
            prefixed = prefixed_order_columns(),
        ))
        .bind(order_id)
        .bind(retailer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        row.try_into()
    }

    /// All orders against an offer (admin)
    pub async fn list_for_offer(&self, offer_id: Uuid) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE offer_id = $1 ORDER BY created_at",
        ))
        .bind(offer_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Advance one order's delivery status a single step forward (admin)
    pub async fn advance_status(&self, order_id: Uuid, next: OrderStatus) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1",
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let current: Order = row.try_into()?;
        if !current.status.can_advance_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "Order cannot move from {} to {}",
                current.status, next
            )));
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {ORDER_COLUMNS}",
        ))
        .bind(next.as_str())
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// Order sheet for an offer as CSV, for handing to the supplier (admin)
    pub async fn export_offer_csv(&self, offer_id: Uuid) -> AppResult<String> {
        let orders = self.list_for_offer(offer_id).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "order_id",
                "retailer",
                "product",
                "brand",
                "unit",
                "quantity",
                "unit_price",
                "total_amount",
                "status",
                "placed_at",
            ])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;

        for order in &orders {
            writer
                .write_record([
                    order.id.to_string(),
                    order.retailer_name.clone(),
                    order.product_name.clone(),
                    order.product_brand.clone(),
                    order.product_unit.clone(),
                    order.quantity.to_string(),
                    order.unit_price.to_string(),
                    order.total_amount.to_string(),
                    order.status.to_string(),
                    order.created_at.to_rfc3339(),
                ])
                .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding: {}", e)))
    }
}

fn prefixed_order_columns() -> String {
    ORDER_COLUMNS
        .split(", ")
        .map(|col| format!("o.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Order row joined with live offer aggregation state
#[derive(Debug, FromRow)]
struct OrderProgressRow {
    #[sqlx(flatten)]
    order: OrderRow,
    offer_status: String,
    offer_aggregated_qty: i64,
    offer_min_fulfillment_qty: i64,
}

impl TryFrom<OrderProgressRow> for OrderWithProgress {
    type Error = AppError;

    fn try_from(row: OrderProgressRow) -> Result<Self, Self::Error> {
        let offer_status = row.offer_status.parse::<OfferStatus>().map_err(|_| {
            AppError::Internal(format!(
                "Unknown offer status in database: {}",
                row.offer_status
            ))
        })?;

        Ok(OrderWithProgress {
            offer_status,
            offer_aggregated_qty: row.offer_aggregated_qty,
            offer_progress_percentage: fulfillment_progress(
                row.offer_aggregated_qty,
                row.offer_min_fulfillment_qty,
            ),
            order: row.order.try_into()?,
        })
    }
}
