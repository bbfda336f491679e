//! Product catalog service

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Product;

/// Maximum decoded size of an inline product image (2 MiB)
const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating a product (admin)
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub brand: String,
    pub barcode: Option<String>,
    pub unit: String,
    pub category: String,
    pub description: Option<String>,
    pub image_base64: Option<String>,
}

/// Input for updating a product (admin)
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_base64: Option<String>,
}

/// Catalog listing filters
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brand: Option<String>,
}

/// Database row for a product
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    brand: String,
    barcode: Option<String>,
    unit: String,
    category: String,
    description: Option<String>,
    image_base64: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            brand: row.brand,
            barcode: row.barcode,
            unit: row.unit,
            category: row.category,
            description: row.description,
            image_base64: row.image_base64,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, brand, barcode, unit, category, description, \
                               image_base64, is_active, created_at, updated_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List active products with optional category/brand filters
    pub async fn list(&self, filter: ProductFilter) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active = true
              AND ($1::TEXT IS NULL OR category = $1)
              AND ($2::TEXT IS NULL OR brand = $2)
            ORDER BY brand, name
            "#,
        ))
        .bind(&filter.category)
        .bind(&filter.brand)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by id
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1",
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Distinct categories among active products
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products WHERE is_active = true ORDER BY category",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(categories)
    }

    /// Distinct brands among active products
    pub async fn brands(&self) -> AppResult<Vec<String>> {
        let brands = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT brand FROM products WHERE is_active = true ORDER BY brand",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(brands)
    }

    /// Create a product (admin)
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        Self::validate_image(input.image_base64.as_deref())?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, brand, barcode, unit, category, description, image_base64)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(&input.name)
        .bind(&input.brand)
        .bind(&input.barcode)
        .bind(&input.unit)
        .bind(&input.category)
        .bind(&input.description)
        .bind(&input.image_base64)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a product (admin)
    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        Self::validate_image(input.image_base64.as_deref())?;

        let current = self.get(product_id).await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $1, brand = $2, barcode = $3, unit = $4, category = $5,
                description = $6, image_base64 = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(input.name.unwrap_or(current.name))
        .bind(input.brand.unwrap_or(current.brand))
        .bind(input.barcode.or(current.barcode))
        .bind(input.unit.unwrap_or(current.unit))
        .bind(input.category.unwrap_or(current.category))
        .bind(input.description.or(current.description))
        .bind(input.image_base64.or(current.image_base64))
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Soft-delete a product (admin)
    pub async fn deactivate(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Validate an inline image payload: must decode and stay under the cap
    fn validate_image(image_base64: Option<&str>) -> AppResult<()> {
        let Some(payload) = image_base64 else {
            return Ok(());
        };

        // Accept data-URL form by stripping the prefix
        let raw = payload.split_once(',').map_or(payload, |(_, rest)| rest);

        let decoded = BASE64.decode(raw).map_err(|_| AppError::Validation {
            field: "image_base64".to_string(),
            message: "Image payload is not valid base64".to_string(),
            message_hi: "छवि डेटा मान्य base64 नहीं है".to_string(),
        })?;

        if decoded.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Validation {
                field: "image_base64".to_string(),
                message: "Image exceeds the 2 MB limit".to_string(),
                message_hi: "छवि 2 MB की सीमा से बड़ी है".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_base64_image_passes() {
        let payload = BASE64.encode([0u8; 64]);
        assert!(ProductService::validate_image(Some(&payload)).is_ok());
        assert!(ProductService::validate_image(None).is_ok());
    }

    #[test]
    fn data_url_prefix_is_tolerated() {
        let payload = format!("data:image/png;base64,{}", BASE64.encode([1u8; 16]));
        assert!(ProductService::validate_image(Some(&payload)).is_ok());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(ProductService::validate_image(Some("not base64!!!")).is_err());
    }

    #[test]
    fn oversized_image_is_rejected() {
        let payload = BASE64.encode(vec![0u8; MAX_IMAGE_BYTES + 1]);
        assert!(ProductService::validate_image(Some(&payload)).is_err());
    }
}
