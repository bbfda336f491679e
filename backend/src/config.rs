//! Configuration management for the GroupBuy Retail Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with GB_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// OTP issuance configuration
    pub otp: OtpConfig,

    /// SMS gateway configuration
    pub sms: SmsConfig,

    /// Admin access configuration
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OtpConfig {
    /// Minutes an OTP stays valid
    pub expiry_minutes: i64,

    /// Verification attempts before the code is invalidated
    pub max_attempts: i32,

    /// Echo the OTP in the send-otp response (development only)
    pub echo_in_response: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmsConfig {
    /// SMS gateway endpoint
    pub api_endpoint: String,

    /// SMS gateway API key
    pub api_key: String,

    /// Registered sender id
    pub sender_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Phone numbers granted the admin claim at login
    pub phones: Vec<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("GB_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            // 7-day sessions; retailers stay signed in on their phones
            .set_default("jwt.access_token_expiry", 604800)?
            .set_default("otp.expiry_minutes", 10)?
            .set_default("otp.max_attempts", 5)?
            .set_default("otp.echo_in_response", environment == "development")?
            .set_default("sms.api_endpoint", "")?
            .set_default("sms.api_key", "")?
            .set_default("sms.sender_id", "GRPBUY")?
            .set_default("admin.phones", Vec::<String>::new())?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GB_ prefix)
            .add_source(
                Environment::with_prefix("GB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
