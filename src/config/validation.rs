//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, TourbookError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_booking_config(&settings.booking)?;

    if settings.features.payments {
        validate_payment_config(&settings.payment)?;
    }
    if settings.features.exchange_rates {
        validate_exchange_config(&settings.exchange)?;
    }

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(TourbookError::Config("Server host is required".to_string()));
    }
    if config.port == 0 {
        return Err(TourbookError::Config("Server port must be non-zero".to_string()));
    }
    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(TourbookError::Config("Database URL is required".to_string()));
    }
    if config.max_connections == 0 {
        return Err(TourbookError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }
    if config.min_connections > config.max_connections {
        return Err(TourbookError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }
    Ok(())
}

fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(TourbookError::Config("Redis URL is required".to_string()));
    }
    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 32 {
        return Err(TourbookError::Config(
            "JWT secret must be at least 32 bytes".to_string(),
        ));
    }
    if config.token_ttl_minutes <= 0 || config.manage_token_ttl_minutes <= 0 {
        return Err(TourbookError::Config(
            "Token lifetimes must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_booking_config(config: &super::BookingConfig) -> Result<()> {
    if config.hold_minutes <= 0 {
        return Err(TourbookError::Config(
            "Booking hold window must be positive".to_string(),
        ));
    }
    if config.max_travelers <= 0 {
        return Err(TourbookError::Config(
            "Max travelers must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Validate payment processor configuration
fn validate_payment_config(config: &super::PaymentConfig) -> Result<()> {
    url::Url::parse(&config.api_url)
        .map_err(|e| TourbookError::Config(format!("Invalid payment API URL: {}", e)))?;
    if config.client_id.is_empty() || config.client_secret.is_empty() {
        return Err(TourbookError::Config(
            "Payment client credentials are required when payments are enabled".to_string(),
        ));
    }
    if config.currency.len() != 3 {
        return Err(TourbookError::Config(
            "Payment currency must be an ISO 4217 code".to_string(),
        ));
    }
    Ok(())
}

fn validate_exchange_config(config: &super::ExchangeConfig) -> Result<()> {
    url::Url::parse(&config.api_url)
        .map_err(|e| TourbookError::Config(format!("Invalid exchange API URL: {}", e)))?;
    if config.base_currency.len() != 3 {
        return Err(TourbookError::Config(
            "Exchange base currency must be an ISO 4217 code".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings.payment.client_id = "client".to_string();
        settings.payment.client_secret = "secret".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = "short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_missing_payment_credentials_rejected() {
        let mut settings = valid_settings();
        settings.payment.client_secret = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_payments_disabled_skips_payment_validation() {
        let mut settings = valid_settings();
        settings.features.payments = false;
        settings.payment.client_secret = String::new();
        assert!(validate_settings(&settings).is_ok());
    }
}
