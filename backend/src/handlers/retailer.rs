//! Retailer registration and profile handlers

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::retailer::{RegisterRetailerInput, UpdateRetailerInput};
use crate::services::{AuthService, RetailerService};
use crate::AppState;
use shared::models::{Retailer, Zone};

/// Registration response: the profile, its zones, and a fresh token carrying
/// the new retailer id
#[derive(Serialize)]
pub struct RegisterResponse {
    pub retailer: Retailer,
    pub zones: Vec<Zone>,
    pub access_token: String,
    pub retailer_id: Uuid,
}

/// POST /api/v1/retailers/register
pub async fn register(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<RegisterRetailerInput>,
) -> AppResult<Json<RegisterResponse>> {
    let service = RetailerService::new(state.db.clone());
    let outcome = service.register(&user.phone, input).await?;

    let auth = AuthService::new(state.db.clone(), &state.config, state.sms.clone());
    let access_token = auth.issue_token(&user.phone, Some(outcome.retailer.id))?;

    Ok(Json(RegisterResponse {
        retailer_id: outcome.retailer.id,
        access_token,
        retailer: outcome.retailer,
        zones: outcome.zones,
    }))
}

/// GET /api/v1/retailers/me
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Retailer>> {
    let service = RetailerService::new(state.db.clone());
    Ok(Json(service.get_by_phone(&user.phone).await?))
}

/// PUT /api/v1/retailers/me
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<UpdateRetailerInput>,
) -> AppResult<Json<Retailer>> {
    let service = RetailerService::new(state.db.clone());
    Ok(Json(service.update_by_phone(&user.phone, input).await?))
}
