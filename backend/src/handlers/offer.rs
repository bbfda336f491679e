//! Offer browsing handlers (retailer-facing)

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::offer::OfferView;
use crate::services::{OfferService, RetailerService};
use crate::AppState;

/// GET /api/v1/offers
///
/// Active offers still taking orders across the caller's zones.
pub async fn list_offers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<OfferView>>> {
    let retailer = RetailerService::new(state.db.clone())
        .get_by_phone(&user.phone)
        .await?;
    let service = OfferService::new(state.db.clone());
    Ok(Json(service.list_for_zones(&retailer.zone_ids).await?))
}

/// GET /api/v1/offers/:id
pub async fn get_offer(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(offer_id): Path<Uuid>,
) -> AppResult<Json<OfferView>> {
    let service = OfferService::new(state.db.clone());
    Ok(Json(service.get_view(offer_id).await?))
}
