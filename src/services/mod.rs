//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod booking;
pub mod exchange;
pub mod otp;
pub mod payment;
pub mod pricing;
pub mod redis;
pub mod stats;

// Re-export commonly used services
pub use auth::{AuthService, Claims};
pub use booking::BookingService;
pub use exchange::{ExchangeRate, ExchangeService};
pub use otp::OtpService;
pub use payment::{CaptureResult, PaymentService};
pub use pricing::{AddonLine, PriceQuote, PricingService};
pub use redis::RedisService;
pub use stats::{DashboardStats, StatsService};

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub pricing_service: PricingService,
    pub booking_service: BookingService,
    pub payment_service: PaymentService,
    pub otp_service: OtpService,
    pub exchange_service: ExchangeService,
    pub stats_service: StatsService,
    pub redis_service: RedisService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, db: DatabaseService) -> Result<Self> {
        let redis_service = RedisService::new(settings.redis.clone())?;
        let auth_service = AuthService::new(settings.auth.clone());
        let pricing_service = PricingService::new(settings.payment.currency.clone());
        let payment_service =
            PaymentService::new(redis_service.clone(), settings.payment.clone())?;
        let booking_service = BookingService::new(
            db.clone(),
            pricing_service.clone(),
            payment_service.clone(),
            settings.booking.clone(),
        );
        let otp_service = OtpService::new(
            redis_service.clone(),
            auth_service.clone(),
            settings.booking.clone(),
        );
        let exchange_service =
            ExchangeService::new(redis_service.clone(), settings.exchange.clone())?;
        let stats_service = StatsService::new(db);

        Ok(Self {
            auth_service,
            pricing_service,
            booking_service,
            payment_service,
            otp_service,
            exchange_service,
            stats_service,
            redis_service,
        })
    }

    /// Health check for backing services
    pub async fn health_check(&self) -> bool {
        self.redis_service.health_check().await.unwrap_or(false)
    }
}
