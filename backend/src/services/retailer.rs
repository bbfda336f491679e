//! Retailer registration and profile service
//!
//! Registration assigns the shop to every active zone whose radius covers it;
//! when no zone matches, a fresh 5 km zone is created around the shop so the
//! retailer always has somewhere to aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{haversine_distance_km, Retailer, Zone};
use shared::types::Location;
use shared::validation::{normalize_phone, validate_phone};

/// Default radius for zones auto-created around an unmatched retailer
const DEFAULT_ZONE_RADIUS_KM: f64 = 5.0;

/// Retailer service
#[derive(Clone)]
pub struct RetailerService {
    db: PgPool,
}

/// Input for registering a retailer (post-OTP signup)
#[derive(Debug, Deserialize)]
pub struct RegisterRetailerInput {
    pub shop_name: String,
    pub owner_name: String,
    pub phone: String,
    pub address: String,
    pub location: Location,
}

/// Input for updating a retailer profile
#[derive(Debug, Deserialize)]
pub struct UpdateRetailerInput {
    pub shop_name: Option<String>,
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub location: Option<Location>,
}

/// Registration result: the profile plus the zones the shop landed in
#[derive(Debug, Serialize)]
pub struct RegisterOutcome {
    pub retailer: Retailer,
    pub zones: Vec<Zone>,
}

/// Database row for a retailer
#[derive(Debug, FromRow)]
struct RetailerRow {
    id: Uuid,
    shop_name: String,
    owner_name: String,
    phone: String,
    address: String,
    latitude: f64,
    longitude: f64,
    zone_ids: Vec<Uuid>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RetailerRow> for Retailer {
    fn from(row: RetailerRow) -> Self {
        Retailer {
            id: row.id,
            shop_name: row.shop_name,
            owner_name: row.owner_name,
            phone: row.phone,
            address: row.address,
            location: Location::new(row.latitude, row.longitude),
            zone_ids: row.zone_ids,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
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

const RETAILER_COLUMNS: &str = "id, shop_name, owner_name, phone, address, latitude, longitude, \
                                zone_ids, is_active, created_at, updated_at";

impl RetailerService {
    /// Create a new RetailerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a retailer for a verified phone number
    pub async fn register(
        &self,
        token_phone: &str,
        input: RegisterRetailerInput,
    ) -> AppResult<RegisterOutcome> {
        validate_phone(&input.phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
            message_hi: "फ़ोन नंबर मान्य नहीं है".to_string(),
        })?;
        let phone = normalize_phone(&input.phone);

        // The registered phone must be the one the token was verified for
        if phone != token_phone {
            return Err(AppError::Validation {
                field: "phone".to_string(),
                message: "Phone number does not match the verified phone".to_string(),
                message_hi: "फ़ोन नंबर सत्यापित नंबर से मेल नहीं खाता".to_string(),
            });
        }

        if input.shop_name.trim().is_empty() || input.owner_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "shop_name".to_string(),
                message: "Shop name and owner name are required".to_string(),
                message_hi: "दुकान और मालिक का नाम आवश्यक है".to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM retailers WHERE phone = $1",
        )
        .bind(&phone)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("phone".to_string()));
        }

        let mut tx = self.db.begin().await?;

        // Find all active zones whose radius covers the shop
        let zones = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, name, latitude, longitude, radius_km, retailer_count, is_active, created_at \
             FROM zones WHERE is_active = true",
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut matched: Vec<ZoneRow> = zones
            .into_iter()
            .filter(|zone| {
                let center = Location::new(zone.latitude, zone.longitude);
                haversine_distance_km(input.location, center) <= zone.radius_km
            })
            .collect();

        if matched.is_empty() {
            // No coverage: open a new zone centred on the shop
            let prefix: String = input.shop_name.chars().take(10).collect();
            let zone = sqlx::query_as::<_, ZoneRow>(
                r#"
                INSERT INTO zones (name, latitude, longitude, radius_km, retailer_count)
                VALUES ($1, $2, $3, $4, 1)
                RETURNING id, name, latitude, longitude, radius_km, retailer_count, is_active, created_at
                "#,
            )
            .bind(format!("Zone-{}", prefix.trim()))
            .bind(input.location.latitude)
            .bind(input.location.longitude)
            .bind(DEFAULT_ZONE_RADIUS_KM)
            .fetch_one(&mut *tx)
            .await?;

            tracing::info!("Created new zone {} for retailer {}", zone.name, input.shop_name);
            matched.push(zone);
        } else {
            let ids: Vec<Uuid> = matched.iter().map(|z| z.id).collect();
            sqlx::query("UPDATE zones SET retailer_count = retailer_count + 1 WHERE id = ANY($1)")
                .bind(&ids)
                .execute(&mut *tx)
                .await?;
            for zone in &mut matched {
                zone.retailer_count += 1;
            }
        }

        let zone_ids: Vec<Uuid> = matched.iter().map(|z| z.id).collect();

        let retailer = sqlx::query_as::<_, RetailerRow>(&format!(
            r#"
            INSERT INTO retailers (shop_name, owner_name, phone, address, latitude, longitude, zone_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {RETAILER_COLUMNS}
            "#,
        ))
        .bind(input.shop_name.trim())
        .bind(input.owner_name.trim())
        .bind(&phone)
        .bind(&input.address)
        .bind(input.location.latitude)
        .bind(input.location.longitude)
        .bind(&zone_ids)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Retailer {} registered in zones: {:?}",
            retailer.shop_name,
            zone_ids
        );

        Ok(RegisterOutcome {
            retailer: retailer.into(),
            zones: matched.into_iter().map(Zone::from).collect(),
        })
    }

    /// Get the retailer for a verified phone
    pub async fn get_by_phone(&self, phone: &str) -> AppResult<Retailer> {
        let row = sqlx::query_as::<_, RetailerRow>(&format!(
            "SELECT {RETAILER_COLUMNS} FROM retailers WHERE phone = $1 AND is_active = true",
        ))
        .bind(phone)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Retailer".to_string()))?;

        Ok(row.into())
    }

    /// Update the retailer profile for a verified phone
    pub async fn update_by_phone(
        &self,
        phone: &str,
        input: UpdateRetailerInput,
    ) -> AppResult<Retailer> {
        let current = self.get_by_phone(phone).await?;

        let shop_name = input.shop_name.unwrap_or(current.shop_name);
        let owner_name = input.owner_name.unwrap_or(current.owner_name);
        let address = input.address.unwrap_or(current.address);
        let location = input.location.unwrap_or(current.location);

        let row = sqlx::query_as::<_, RetailerRow>(&format!(
            r#"
            UPDATE retailers
            SET shop_name = $1, owner_name = $2, address = $3, latitude = $4, longitude = $5,
                updated_at = NOW()
            WHERE phone = $6
            RETURNING {RETAILER_COLUMNS}
            "#,
        ))
        .bind(&shop_name)
        .bind(&owner_name)
        .bind(&address)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(phone)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List all retailers (admin)
    pub async fn list_all(&self) -> AppResult<Vec<Retailer>> {
        let rows = sqlx::query_as::<_, RetailerRow>(&format!(
            "SELECT {RETAILER_COLUMNS} FROM retailers ORDER BY created_at DESC",
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Retailer::from).collect())
    }
}
