//! Zone management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Zone;
use shared::types::Location;

/// Zone service
#[derive(Clone)]
pub struct ZoneService {
    db: PgPool,
}

/// Input for creating a zone (admin)
#[derive(Debug, Deserialize)]
pub struct CreateZoneInput {
    pub name: String,
    pub center: Location,
    pub radius_km: Option<f64>,
}

/// Database row for a zone
#[derive(Debug, FromRow)]
struct ZoneRow {
    id: Uuid,
    name: String,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    retailer_count: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<ZoneRow> for Zone {
    fn from(row: ZoneRow) -> Self {
        Zone {
            id: row.id,
            name: row.name,
            center: Location::new(row.latitude, row.longitude),
            radius_km: row.radius_km,
            retailer_count: row.retailer_count,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl ZoneService {
    /// Create a new ZoneService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all active zones
    pub async fn list_active(&self) -> AppResult<Vec<Zone>> {
        let rows = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, name, latitude, longitude, radius_km, retailer_count, is_active, created_at \
             FROM zones WHERE is_active = true ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Zone::from).collect())
    }

    /// List the zones a retailer belongs to
    pub async fn list_for_retailer(&self, zone_ids: &[Uuid]) -> AppResult<Vec<Zone>> {
        let rows = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, name, latitude, longitude, radius_km, retailer_count, is_active, created_at \
             FROM zones WHERE id = ANY($1) ORDER BY name",
        )
        .bind(zone_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Zone::from).collect())
    }

    /// Create a zone (admin)
    pub async fn create(&self, input: CreateZoneInput) -> AppResult<Zone> {
        let radius_km = input.radius_km.unwrap_or(5.0);
        if radius_km <= 0.0 {
            return Err(AppError::Validation {
                field: "radius_km".to_string(),
                message: "Zone radius must be positive".to_string(),
                message_hi: "ज़ोन की त्रिज्या धनात्मक होनी चाहिए".to_string(),
            });
        }

        let row = sqlx::query_as::<_, ZoneRow>(
            r#"
            INSERT INTO zones (name, latitude, longitude, radius_km)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, latitude, longitude, radius_km, retailer_count, is_active, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.center.latitude)
        .bind(input.center.longitude)
        .bind(radius_km)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}
