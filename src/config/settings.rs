//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub payment: PaymentConfig,
    pub exchange: ExchangeConfig,
    pub booking: BookingConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of admin/customer login tokens
    pub token_ttl_minutes: i64,
    /// Lifetime of booking manage tokens issued after OTP verification
    pub manage_token_ttl_minutes: i64,
}

/// Payment processor configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// ISO 4217 code of the authoritative charge currency
    pub currency: String,
    pub timeout_seconds: u64,
}

/// Exchange-rate API configuration (display rates only)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    pub api_url: String,
    pub base_currency: String,
    pub cache_ttl_seconds: u64,
    pub timeout_seconds: u64,
}

/// Booking behaviour configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingConfig {
    /// How long a pending booking holds its seats before expiring
    pub hold_minutes: i64,
    pub max_travelers: i32,
    /// OTP code lifetime for the booking lookup flow
    pub otp_ttl_seconds: u64,
    pub otp_max_attempts: u32,
    /// Checkout session lifetime in redis
    pub session_ttl_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    /// When disabled, payment endpoints return 503 and bookings stay pending
    pub payments: bool,
    /// When disabled, the exchange-rate endpoint serves only the base currency
    pub exchange_rates: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("TOURBOOK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::TourbookError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/tourbook".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "tourbook:".to_string(),
                ttl_seconds: 3600,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_minutes: 8 * 60,
                manage_token_ttl_minutes: 30,
            },
            payment: PaymentConfig {
                api_url: "https://api-m.sandbox.paypal.com".to_string(),
                client_id: String::new(),
                client_secret: String::new(),
                currency: "USD".to_string(),
                timeout_seconds: 15,
            },
            exchange: ExchangeConfig {
                api_url: "https://open.er-api.com/v6".to_string(),
                base_currency: "USD".to_string(),
                cache_ttl_seconds: 3600,
                timeout_seconds: 5,
            },
            booking: BookingConfig {
                hold_minutes: 30,
                max_travelers: 16,
                otp_ttl_seconds: 600,
                otp_max_attempts: 5,
                session_ttl_seconds: 3600,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "./logs".to_string(),
            },
            features: FeaturesConfig {
                payments: true,
                exchange_rates: true,
            },
        }
    }
}
