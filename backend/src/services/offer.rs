//! Supplier offer service
//!
//! Offers are created by admins against a product + supplier + zone with a
//! validated slab table. Retailer-facing reads return a joined view with live
//! fulfillment progress and the next-slab incentive.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{fulfillment_progress, OfferStatus, SlabTable, SupplierOffer};
use shared::pricing::{next_slab_preview, unit_price_for, NextSlab};
use shared::validation::validate_slab_table;

/// Offer service
#[derive(Clone)]
pub struct OfferService {
    db: PgPool,
}

/// Input for creating an offer (admin)
#[derive(Debug, Deserialize)]
pub struct CreateOfferInput {
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub zone_id: Uuid,
    pub quantity_slabs: SlabTable,
    pub min_fulfillment_qty: i64,
    pub lead_time_days: Option<i32>,
}

/// Input for updating an open offer (admin)
#[derive(Debug, Deserialize)]
pub struct UpdateOfferInput {
    pub quantity_slabs: Option<SlabTable>,
    pub min_fulfillment_qty: Option<i64>,
    pub lead_time_days: Option<i32>,
    pub is_active: Option<bool>,
}

/// Admin listing filters
#[derive(Debug, Default, Deserialize)]
pub struct OfferFilter {
    pub zone_id: Option<Uuid>,
    pub status: Option<String>,
}

/// Retailer-facing view of an offer with catalog names and live progress
#[derive(Debug, Serialize)]
pub struct OfferView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_brand: String,
    pub product_unit: String,
    pub product_category: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub supplier_code: String,
    pub zone_id: Uuid,
    pub zone_name: String,
    pub quantity_slabs: SlabTable,
    pub min_fulfillment_qty: i64,
    pub lead_time_days: i32,
    pub current_aggregated_qty: i64,
    pub status: OfferStatus,
    /// Zone-wide unit price at the current aggregated quantity
    pub current_unit_price: Option<Decimal>,
    pub progress_percentage: Decimal,
    /// "Order N more units to unlock a cheaper price" incentive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_slab: Option<NextSlab>,
    pub created_at: DateTime<Utc>,
}

/// Database row for an offer
#[derive(Debug, FromRow)]
struct OfferRow {
    id: Uuid,
    product_id: Uuid,
    supplier_id: Uuid,
    zone_id: Uuid,
    quantity_slabs: Json<SlabTable>,
    min_fulfillment_qty: i64,
    lead_time_days: i32,
    current_aggregated_qty: i64,
    status: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Offer row joined with product/supplier/zone names
#[derive(Debug, FromRow)]
struct OfferViewRow {
    id: Uuid,
    product_id: Uuid,
    product_name: String,
    product_brand: String,
    product_unit: String,
    product_category: String,
    supplier_id: Uuid,
    supplier_name: String,
    supplier_code: String,
    zone_id: Uuid,
    zone_name: String,
    quantity_slabs: Json<SlabTable>,
    min_fulfillment_qty: i64,
    lead_time_days: i32,
    current_aggregated_qty: i64,
    status: String,
    created_at: DateTime<Utc>,
}

fn parse_status(raw: &str) -> AppResult<OfferStatus> {
    raw.parse::<OfferStatus>()
        .map_err(|_| AppError::Internal(format!("Unknown offer status in database: {}", raw)))
}

impl TryFrom<OfferRow> for SupplierOffer {
    type Error = AppError;

    fn try_from(row: OfferRow) -> Result<Self, Self::Error> {
        Ok(SupplierOffer {
            id: row.id,
            product_id: row.product_id,
            supplier_id: row.supplier_id,
            zone_id: row.zone_id,
            quantity_slabs: row.quantity_slabs.0,
            min_fulfillment_qty: row.min_fulfillment_qty,
            lead_time_days: row.lead_time_days,
            current_aggregated_qty: row.current_aggregated_qty,
            status: parse_status(&row.status)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<OfferViewRow> for OfferView {
    type Error = AppError;

    fn try_from(row: OfferViewRow) -> Result<Self, Self::Error> {
        let slabs = row.quantity_slabs.0;
        let status = parse_status(&row.status)?;

        // An aggregated quantity of zero has no slab yet; price preview starts
        // from the first unit
        let preview_qty = row.current_aggregated_qty.max(1);
        let current_unit_price = unit_price_for(&slabs, preview_qty).ok();
        let next_slab = next_slab_preview(&slabs, preview_qty).ok().flatten();

        Ok(OfferView {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_brand: row.product_brand,
            product_unit: row.product_unit,
            product_category: row.product_category,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            supplier_code: row.supplier_code,
            zone_id: row.zone_id,
            zone_name: row.zone_name,
            min_fulfillment_qty: row.min_fulfillment_qty,
            lead_time_days: row.lead_time_days,
            current_aggregated_qty: row.current_aggregated_qty,
            status,
            current_unit_price,
            progress_percentage: fulfillment_progress(
                row.current_aggregated_qty,
                row.min_fulfillment_qty,
            ),
            next_slab,
            quantity_slabs: slabs,
            created_at: row.created_at,
        })
    }
}

const OFFER_COLUMNS: &str = "id, product_id, supplier_id, zone_id, quantity_slabs, \
                             min_fulfillment_qty, lead_time_days, current_aggregated_qty, \
                             status, is_active, created_at, updated_at";

const OFFER_VIEW_SELECT: &str = r#"
    SELECT o.id, o.product_id, p.name AS product_name, p.brand AS product_brand,
           p.unit AS product_unit, p.category AS product_category,
           o.supplier_id, s.name AS supplier_name, s.code AS supplier_code,
           o.zone_id, z.name AS zone_name,
           o.quantity_slabs, o.min_fulfillment_qty, o.lead_time_days,
           o.current_aggregated_qty, o.status, o.created_at
    FROM supplier_offers o
    JOIN products p ON p.id = o.product_id
    JOIN suppliers s ON s.id = o.supplier_id
    JOIN zones z ON z.id = o.zone_id
"#;

impl OfferService {
    /// Create a new OfferService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an offer (admin)
    pub async fn create(&self, input: CreateOfferInput) -> AppResult<SupplierOffer> {
        validate_slab_table(&input.quantity_slabs).map_err(|msg| AppError::Validation {
            field: "quantity_slabs".to_string(),
            message: msg.to_string(),
            message_hi: "मात्रा स्लैब मान्य नहीं हैं".to_string(),
        })?;

        if input.min_fulfillment_qty <= 0 {
            return Err(AppError::Validation {
                field: "min_fulfillment_qty".to_string(),
                message: "Minimum fulfillment quantity must be positive".to_string(),
                message_hi: "न्यूनतम पूर्ति मात्रा धनात्मक होनी चाहिए".to_string(),
            });
        }

        self.ensure_exists("products", input.product_id, "Product").await?;
        self.ensure_exists("suppliers", input.supplier_id, "Supplier").await?;
        self.ensure_exists("zones", input.zone_id, "Zone").await?;

        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM supplier_offers \
             WHERE product_id = $1 AND supplier_id = $2 AND zone_id = $3 \
               AND is_active = true AND status = 'open'",
        )
        .bind(input.product_id)
        .bind(input.supplier_id)
        .bind(input.zone_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::DuplicateEntry("open offer".to_string()));
        }

        let row = sqlx::query_as::<_, OfferRow>(&format!(
            r#"
            INSERT INTO supplier_offers
                (product_id, supplier_id, zone_id, quantity_slabs, min_fulfillment_qty, lead_time_days)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {OFFER_COLUMNS}
            "#,
        ))
        .bind(input.product_id)
        .bind(input.supplier_id)
        .bind(input.zone_id)
        .bind(Json(&input.quantity_slabs))
        .bind(input.min_fulfillment_qty)
        .bind(input.lead_time_days.unwrap_or(3))
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// Update an offer (admin); terms are only editable while the offer is open
    pub async fn update(&self, offer_id: Uuid, input: UpdateOfferInput) -> AppResult<SupplierOffer> {
        let current = self.get(offer_id).await?;

        let terms_changed = input.quantity_slabs.is_some() || input.min_fulfillment_qty.is_some();
        if terms_changed && current.status != OfferStatus::Open {
            return Err(AppError::InvalidStateTransition(format!(
                "Offer terms cannot change once the offer is {}",
                current.status
            )));
        }

        let slabs = input.quantity_slabs.unwrap_or(current.quantity_slabs);
        validate_slab_table(&slabs).map_err(|msg| AppError::Validation {
            field: "quantity_slabs".to_string(),
            message: msg.to_string(),
            message_hi: "मात्रा स्लैब मान्य नहीं हैं".to_string(),
        })?;

        let min_fulfillment_qty = input.min_fulfillment_qty.unwrap_or(current.min_fulfillment_qty);
        if min_fulfillment_qty <= 0 {
            return Err(AppError::Validation {
                field: "min_fulfillment_qty".to_string(),
                message: "Minimum fulfillment quantity must be positive".to_string(),
                message_hi: "न्यूनतम पूर्ति मात्रा धनात्मक होनी चाहिए".to_string(),
            });
        }

        let row = sqlx::query_as::<_, OfferRow>(&format!(
            r#"
            UPDATE supplier_offers
            SET quantity_slabs = $1, min_fulfillment_qty = $2, lead_time_days = $3,
                is_active = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {OFFER_COLUMNS}
            "#,
        ))
        .bind(Json(&slabs))
        .bind(min_fulfillment_qty)
        .bind(input.lead_time_days.unwrap_or(current.lead_time_days))
        .bind(input.is_active.unwrap_or(current.is_active))
        .bind(offer_id)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// Get a raw offer by id
    pub async fn get(&self, offer_id: Uuid) -> AppResult<SupplierOffer> {
        let row = sqlx::query_as::<_, OfferRow>(&format!(
            "SELECT {OFFER_COLUMNS} FROM supplier_offers WHERE id = $1",
        ))
        .bind(offer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Offer".to_string()))?;

        row.try_into()
    }

    /// Joined detail view of a single active offer
    pub async fn get_view(&self, offer_id: Uuid) -> AppResult<OfferView> {
        let row = sqlx::query_as::<_, OfferViewRow>(&format!(
            "{OFFER_VIEW_SELECT} WHERE o.id = $1 AND o.is_active = true",
        ))
        .bind(offer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Offer".to_string()))?;

        row.try_into()
    }

    /// Active offers still taking orders across the retailer's zones
    pub async fn list_for_zones(&self, zone_ids: &[Uuid]) -> AppResult<Vec<OfferView>> {
        let rows = sqlx::query_as::<_, OfferViewRow>(&format!(
            "{OFFER_VIEW_SELECT} \
             WHERE o.zone_id = ANY($1) AND o.is_active = true \
               AND o.status IN ('open', 'ready_to_pack') \
             ORDER BY o.created_at DESC",
        ))
        .bind(zone_ids)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(OfferView::try_from).collect()
    }

    /// All offers with optional zone/status filters (admin)
    pub async fn list_all(&self, filter: OfferFilter) -> AppResult<Vec<OfferView>> {
        if let Some(raw) = &filter.status {
            raw.parse::<OfferStatus>().map_err(|_| AppError::Validation {
                field: "status".to_string(),
                message: format!("Unknown offer status: {}", raw),
                message_hi: "ऑफ़र स्थिति मान्य नहीं है".to_string(),
            })?;
        }

        let rows = sqlx::query_as::<_, OfferViewRow>(&format!(
            "{OFFER_VIEW_SELECT} \
             WHERE ($1::UUID IS NULL OR o.zone_id = $1) \
               AND ($2::TEXT IS NULL OR o.status = $2) \
             ORDER BY o.created_at DESC",
        ))
        .bind(filter.zone_id)
        .bind(&filter.status)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(OfferView::try_from).collect()
    }

    /// Advance an offer one step along the fulfillment pipeline (admin)
    ///
    /// The matching order statuses cascade so every retailer sees the same
    /// delivery stage.
    pub async fn advance_status(&self, offer_id: Uuid, next: OfferStatus) -> AppResult<SupplierOffer> {
        let current = self.get(offer_id).await?;

        if !current.status.can_advance_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "Offer cannot move from {} to {}",
                current.status, next
            )));
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, OfferRow>(&format!(
            "UPDATE supplier_offers SET status = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {OFFER_COLUMNS}",
        ))
        .bind(next.as_str())
        .bind(offer_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE offer_id = $2",
        )
        .bind(next.as_str())
        .bind(offer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Offer {} advanced to {}", offer_id, next);

        row.try_into()
    }

    async fn ensure_exists(&self, table: &str, id: Uuid, resource: &str) -> AppResult<()> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {table} WHERE id = $1 AND is_active = true",
        ))
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if count == 0 {
            return Err(AppError::NotFound(resource.to_string()));
        }
        Ok(())
    }
}
