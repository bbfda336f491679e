//! Error handling for the GroupBuy Retail Platform
//!
//! Provides consistent error responses in English and Hindi

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        message_hi: String,
    },

    #[error("Admin access required")]
    AdminRequired,

    // OTP errors
    #[error("No OTP found for this phone")]
    OtpNotFound,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    OtpInvalid,

    #[error("Too many OTP attempts")]
    TooManyOtpAttempts,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_hi: String,
    },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Offer not open for orders: {0}")]
    OfferNotOpenForOrders(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Concurrent update conflict")]
    ConcurrentUpdateConflict,

    // External service errors
    #[error("SMS gateway error: {0}")]
    SmsGatewayError(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_hi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message_en: "Session has expired, please sign in again".to_string(),
                    message_hi: "सत्र समाप्त हो गया है, कृपया फिर से साइन इन करें".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message_en: "Invalid token".to_string(),
                    message_hi: "टोकन मान्य नहीं है".to_string(),
                    field: None,
                },
            ),
            AppError::Unauthorized { message, message_hi } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "UNAUTHORIZED".to_string(),
                    message_en: message.clone(),
                    message_hi: message_hi.clone(),
                    field: None,
                },
            ),
            AppError::AdminRequired => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "ADMIN_REQUIRED".to_string(),
                    message_en: "This action requires admin access".to_string(),
                    message_hi: "इस कार्रवाई के लिए व्यवस्थापक अधिकार आवश्यक हैं".to_string(),
                    field: None,
                },
            ),
            AppError::OtpNotFound => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "OTP_NOT_FOUND".to_string(),
                    message_en: "No OTP found. Please request a new one.".to_string(),
                    message_hi: "कोई ओटीपी नहीं मिला। कृपया नया अनुरोध करें।".to_string(),
                    field: None,
                },
            ),
            AppError::OtpExpired => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "OTP_EXPIRED".to_string(),
                    message_en: "OTP expired. Please request a new one.".to_string(),
                    message_hi: "ओटीपी की समय सीमा समाप्त हो गई। कृपया नया अनुरोध करें।".to_string(),
                    field: None,
                },
            ),
            AppError::OtpInvalid => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "OTP_INVALID".to_string(),
                    message_en: "Invalid OTP".to_string(),
                    message_hi: "ओटीपी गलत है".to_string(),
                    field: None,
                },
            ),
            AppError::TooManyOtpAttempts => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "TOO_MANY_ATTEMPTS".to_string(),
                    message_en: "Too many attempts. Please request a new OTP.".to_string(),
                    message_hi: "बहुत अधिक प्रयास। कृपया नया ओटीपी मांगें।".to_string(),
                    field: None,
                },
            ),
            AppError::Validation { field, message, message_hi } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_hi: message_hi.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::InvalidQuantity(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_QUANTITY".to_string(),
                    message_en: msg.clone(),
                    message_hi: "मात्रा मान्य नहीं है".to_string(),
                    field: Some("quantity".to_string()),
                },
            ),
            AppError::DuplicateEntry(what) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("A record with this {} already exists", what),
                    message_hi: format!("यह {} पहले से मौजूद है", what),
                    field: Some(what.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_hi: format!("{} नहीं मिला", resource),
                    field: None,
                },
            ),
            AppError::OfferNotOpenForOrders(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "OFFER_NOT_OPEN".to_string(),
                    message_en: msg.clone(),
                    message_hi: "यह ऑफ़र अब ऑर्डर स्वीकार नहीं कर रहा है".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidStateTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVALID_STATE_TRANSITION".to_string(),
                    message_en: msg.clone(),
                    message_hi: format!("स्थिति नहीं बदली जा सकती: {}", msg),
                    field: None,
                },
            ),
            AppError::ConcurrentUpdateConflict => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONCURRENT_UPDATE_CONFLICT".to_string(),
                    message_en: "The offer was updated by another order. Please retry.".to_string(),
                    message_hi: "ऑफ़र किसी अन्य ऑर्डर से अपडेट हो गया। कृपया पुनः प्रयास करें।".to_string(),
                    field: None,
                },
            ),
            AppError::SmsGatewayError(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "SMS_GATEWAY_ERROR".to_string(),
                    message_en: format!("SMS gateway error: {}", msg),
                    message_hi: format!("एसएमएस सेवा में त्रुटि: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_hi: "डेटाबेस में त्रुटि हुई".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_hi: "सर्वर में आंतरिक त्रुटि".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
