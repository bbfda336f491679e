//! Supplier management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Supplier;
use shared::validation::validate_supplier_code;

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Input for creating a supplier (admin)
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

/// Database row for a supplier
#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    code: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            code: row.code,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all active suppliers
    pub async fn list_active(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, code, description, is_active, created_at \
             FROM suppliers WHERE is_active = true ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Get a supplier by id
    pub async fn get(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, code, description, is_active, created_at FROM suppliers WHERE id = $1",
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(row.into())
    }

    /// Create a supplier with a unique upper-cased code (admin)
    pub async fn create(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        let code = input.code.trim().to_uppercase();
        validate_supplier_code(&code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
            message_hi: "आपूर्तिकर्ता कोड मान्य नहीं है".to_string(),
        })?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM suppliers WHERE code = $1",
        )
        .bind(&code)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("supplier code".to_string()));
        }

        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (name, code, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, code, description, is_active, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&code)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}
