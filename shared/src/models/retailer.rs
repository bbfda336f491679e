//! Retailer (kirana shop) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Location;

/// A retailer shop registered on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retailer {
    pub id: Uuid,
    pub shop_name: String,
    pub owner_name: String,
    /// 10-digit mobile number, unique; doubles as the login identity
    pub phone: String,
    pub address: String,
    pub location: Location,
    /// Zones whose radius covers the shop; assigned at registration
    pub zone_ids: Vec<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
