//! Authentication service: phone OTP issuance/verification and JWT tokens
//!
//! There are no passwords. A retailer proves control of a phone number via a
//! 6-digit OTP; the resulting JWT carries the phone, the retailer id once
//! registration is complete, and the admin claim for configured admin phones.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::SmsClient;
use crate::middleware::auth::Claims;
use shared::validation::{normalize_phone, validate_otp_format, validate_phone};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    sms: SmsClient,
    jwt_secret: String,
    access_token_expiry: i64,
    otp_expiry_minutes: i64,
    otp_max_attempts: i32,
    echo_otp: bool,
    admin_phones: Vec<String>,
}

/// Input for requesting an OTP
#[derive(Debug, Deserialize)]
pub struct SendOtpInput {
    pub phone: String,
}

/// Response after an OTP has been issued
#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    /// Present only when otp.echo_in_response is enabled (development)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Input for verifying an OTP
#[derive(Debug, Deserialize)]
pub struct VerifyOtpInput {
    pub phone: String,
    pub otp: String,
}

/// Response after successful OTP verification
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    /// True when no retailer profile exists yet for this phone
    pub is_new_user: bool,
    pub retailer_id: Option<Uuid>,
}

/// Pending OTP row
#[derive(Debug, sqlx::FromRow)]
struct OtpRow {
    code_hash: String,
    expires_at: DateTime<Utc>,
    attempts: i32,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config, sms: SmsClient) -> Self {
        Self {
            db,
            sms,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            otp_expiry_minutes: config.otp.expiry_minutes,
            otp_max_attempts: config.otp.max_attempts,
            echo_otp: config.otp.echo_in_response,
            admin_phones: config.admin.phones.clone(),
        }
    }

    /// Generate and deliver an OTP for a phone number
    ///
    /// Any previously issued code for the phone is replaced.
    pub async fn send_otp(&self, input: SendOtpInput) -> AppResult<SendOtpResponse> {
        validate_phone(&input.phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
            message_hi: "फ़ोन नंबर मान्य नहीं है".to_string(),
        })?;
        let phone = normalize_phone(&input.phone);

        let code = Self::generate_otp();
        let expires_at = Utc::now() + Duration::minutes(self.otp_expiry_minutes);

        sqlx::query(
            r#"
            INSERT INTO otp_codes (phone, code_hash, expires_at, attempts)
            VALUES ($1, $2, $3, 0)
            ON CONFLICT (phone)
            DO UPDATE SET code_hash = $2, expires_at = $3, attempts = 0, created_at = NOW()
            "#,
        )
        .bind(&phone)
        .bind(Self::hash_code(&code))
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        self.sms.send_otp(&phone, &code).await?;

        Ok(SendOtpResponse {
            success: true,
            message: "OTP sent successfully".to_string(),
            otp: self.echo_otp.then_some(code),
        })
    }

    /// Verify an OTP and issue a JWT
    pub async fn verify_otp(&self, input: VerifyOtpInput) -> AppResult<TokenResponse> {
        let phone = normalize_phone(&input.phone);
        validate_otp_format(&input.otp).map_err(|_| AppError::OtpInvalid)?;

        let record = sqlx::query_as::<_, OtpRow>(
            "SELECT code_hash, expires_at, attempts FROM otp_codes WHERE phone = $1",
        )
        .bind(&phone)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::OtpNotFound)?;

        if Utc::now() > record.expires_at {
            self.delete_otp(&phone).await?;
            return Err(AppError::OtpExpired);
        }

        if record.attempts >= self.otp_max_attempts {
            self.delete_otp(&phone).await?;
            return Err(AppError::TooManyOtpAttempts);
        }

        if Self::hash_code(&input.otp) != record.code_hash {
            sqlx::query("UPDATE otp_codes SET attempts = attempts + 1 WHERE phone = $1")
                .bind(&phone)
                .execute(&self.db)
                .await?;
            return Err(AppError::OtpInvalid);
        }

        // Verified: the code is single-use
        self.delete_otp(&phone).await?;

        let retailer_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM retailers WHERE phone = $1 AND is_active = true",
        )
        .bind(&phone)
        .fetch_optional(&self.db)
        .await?;

        let access_token = self.issue_token(&phone, retailer_id)?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            is_new_user: retailer_id.is_none(),
            retailer_id,
        })
    }

    /// Issue a JWT for a verified phone
    ///
    /// Also used after retailer registration so the fresh token carries the
    /// new retailer id.
    pub fn issue_token(&self, phone: &str, retailer_id: Option<Uuid>) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: phone.to_string(),
            retailer_id: retailer_id.map(|id| id.to_string()),
            is_admin: self.admin_phones.iter().any(|p| p == phone),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    async fn delete_otp(&self, phone: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM otp_codes WHERE phone = $1")
            .bind(phone)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Generate a 6-digit OTP
    fn generate_otp() -> String {
        let mut rng = rand::thread_rng();
        format!("{:06}", rng.gen_range(0..1_000_000))
    }

    /// Hash an OTP for storage; codes are never persisted in the clear
    fn hash_code(code: &str) -> String {
        let digest = Sha256::digest(code.as_bytes());
        format!("{:x}", digest)
    }
}
