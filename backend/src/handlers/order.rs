//! Order handlers (retailer-facing)

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::order::{OrderWithProgress, PlaceOrderInput, PlacementSummary};
use crate::services::{OrderService, RetailerService};
use crate::AppState;

/// POST /api/v1/orders
pub async fn place_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<PlaceOrderInput>,
) -> AppResult<Json<PlacementSummary>> {
    let retailer = RetailerService::new(state.db.clone())
        .get_by_phone(&user.phone)
        .await?;
    let service = OrderService::new(state.db.clone());
    Ok(Json(service.place_order(retailer.id, input).await?))
}

/// GET /api/v1/orders
pub async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<OrderWithProgress>>> {
    let retailer = RetailerService::new(state.db.clone())
        .get_by_phone(&user.phone)
        .await?;
    let service = OrderService::new(state.db.clone());
    Ok(Json(service.list_for_retailer(retailer.id).await?))
}

/// GET /api/v1/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderWithProgress>> {
    let retailer = RetailerService::new(state.db.clone())
        .get_by_phone(&user.phone)
        .await?;
    let service = OrderService::new(state.db.clone());
    Ok(Json(service.get_for_retailer(retailer.id, order_id).await?))
}
