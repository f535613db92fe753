//! Test helpers
//!
//! Shared utilities for integration tests: a mock payment processor built
//! on wiremock, config builders, and availability probes so tests that
//! need a live redis or Postgres can skip cleanly instead of failing.

pub mod payment_mock;

pub use payment_mock::PaymentMock;

use sqlx::PgPool;
use tourbook::config::{AuthConfig, BookingConfig, PaymentConfig, RedisConfig};
use tourbook::services::RedisService;
use uuid::Uuid;

pub fn redis_url() -> String {
    std::env::var("TEST_REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

/// Redis config with a unique prefix so parallel tests never collide
pub fn redis_config() -> RedisConfig {
    RedisConfig {
        url: redis_url(),
        prefix: format!("tourbook_test_{}:", Uuid::new_v4().simple()),
        ttl_seconds: 300,
    }
}

/// Connects to redis, or None when no server is reachable
pub async fn redis_service_or_skip() -> Option<RedisService> {
    let service = RedisService::new(redis_config()).ok()?;
    match service.health_check().await {
        Ok(true) => Some(service),
        _ => {
            eprintln!("skipping: redis not reachable at {}", redis_url());
            None
        }
    }
}

/// Connects to Postgres and runs migrations, or None when TEST_DATABASE_URL
/// is not set or the server is unreachable
pub async fn database_pool_or_skip() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: TEST_DATABASE_URL not set");
            return None;
        }
    };

    match PgPool::connect(&url).await {
        Ok(pool) => {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("migrations apply");
            Some(pool)
        }
        Err(e) => {
            eprintln!("skipping: postgres not reachable at {}: {}", url, e);
            None
        }
    }
}

pub fn payment_config(api_url: &str) -> PaymentConfig {
    PaymentConfig {
        api_url: api_url.to_string(),
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        currency: "USD".to_string(),
        timeout_seconds: 5,
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-test-secret-test-secret".to_string(),
        token_ttl_minutes: 60,
        manage_token_ttl_minutes: 30,
    }
}

pub fn booking_config() -> BookingConfig {
    BookingConfig {
        hold_minutes: 30,
        max_travelers: 8,
        otp_ttl_seconds: 600,
        otp_max_attempts: 3,
        session_ttl_seconds: 3600,
    }
}
