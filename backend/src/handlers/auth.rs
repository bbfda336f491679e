//! OTP authentication handlers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::auth::{SendOtpInput, SendOtpResponse, TokenResponse, VerifyOtpInput};
use crate::services::AuthService;
use crate::AppState;

/// POST /api/v1/auth/send-otp
pub async fn send_otp(
    State(state): State<AppState>,
    Json(input): Json<SendOtpInput>,
) -> AppResult<Json<SendOtpResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config, state.sms.clone());
    Ok(Json(service.send_otp(input).await?))
}

/// POST /api/v1/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<VerifyOtpInput>,
) -> AppResult<Json<TokenResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config, state.sms.clone());
    Ok(Json(service.verify_otp(input).await?))
}
