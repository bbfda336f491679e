//! Product catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub barcode: Option<String>,
    /// Selling unit, e.g. "kg", "piece", "pack", "litre"
    pub unit: String,
    pub category: String,
    pub description: Option<String>,
    /// Inline base64 image payload; object storage is a later migration
    pub image_base64: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
