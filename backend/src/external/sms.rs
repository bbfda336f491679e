//! SMS gateway client for OTP delivery
//!
//! Talks to a transactional SMS provider over HTTP. When no endpoint is
//! configured (development), messages are logged instead of sent.

use reqwest::Client;
use serde::Serialize;

use crate::config::SmsConfig;
use crate::error::{AppError, AppResult};

/// SMS gateway client
#[derive(Clone)]
pub struct SmsClient {
    client: Client,
    api_endpoint: String,
    api_key: String,
    sender_id: String,
}

#[derive(Debug, Serialize)]
struct SendSmsRequest<'a> {
    to: &'a str,
    sender_id: &'a str,
    message: &'a str,
}

impl SmsClient {
    /// Create a new SmsClient instance
    pub fn new(config: &SmsConfig) -> Self {
        Self {
            client: Client::new(),
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            sender_id: config.sender_id.clone(),
        }
    }

    /// Whether a real gateway is configured
    pub fn is_configured(&self) -> bool {
        !self.api_endpoint.is_empty()
    }

    /// Send an OTP code to a phone number
    pub async fn send_otp(&self, phone: &str, code: &str) -> AppResult<()> {
        let message = format!("{} is your GroupBuy verification code. Valid for 10 minutes.", code);

        if !self.is_configured() {
            // Development: the code is surfaced through logs (and optionally
            // echoed in the API response, see OtpConfig::echo_in_response)
            tracing::info!("OTP for {}: {}", phone, code);
            return Ok(());
        }

        let response = self
            .client
            .post(&self.api_endpoint)
            .bearer_auth(&self.api_key)
            .json(&SendSmsRequest {
                to: phone,
                sender_id: &self.sender_id,
                message: &message,
            })
            .send()
            .await
            .map_err(|e| AppError::SmsGatewayError(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SmsGatewayError(format!(
                "gateway returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}
