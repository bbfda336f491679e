//! Zone handlers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{RetailerService, ZoneService};
use crate::AppState;
use shared::models::Zone;

/// GET /api/v1/zones
pub async fn list_zones(State(state): State<AppState>) -> AppResult<Json<Vec<Zone>>> {
    let service = ZoneService::new(state.db.clone());
    Ok(Json(service.list_active().await?))
}

/// GET /api/v1/zones/my
pub async fn my_zones(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Zone>>> {
    let retailer = RetailerService::new(state.db.clone())
        .get_by_phone(&user.phone)
        .await?;
    let service = ZoneService::new(state.db.clone());
    Ok(Json(service.list_for_retailer(&retailer.zone_ids).await?))
}
