//! Configuration module
//!
//! Settings loading, structure definitions, and validation.

pub mod settings;
pub mod validation;

pub use settings::{
    AuthConfig, BookingConfig, DatabaseConfig, ExchangeConfig, FeaturesConfig, LoggingConfig,
    PaymentConfig, RedisConfig, ServerConfig, Settings,
};
