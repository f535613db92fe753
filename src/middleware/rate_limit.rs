//! Rate limiting for abuse-prone endpoints
//!
//! Fixed-window counters in Redis guard the OTP request and verify
//! endpoints so booking references cannot be enumerated by brute force.

use tracing::{debug, warn};

use crate::services::redis::RedisService;
use crate::utils::errors::{Result, TourbookError};

/// Fixed-window rate limiter keyed by caller identity
#[derive(Debug, Clone)]
pub struct RateLimiter {
    redis: RedisService,
    max_requests: u64,
    window_seconds: u64,
}

impl RateLimiter {
    pub fn new(redis: RedisService, max_requests: u64, window_seconds: u64) -> Self {
        Self {
            redis,
            max_requests,
            window_seconds,
        }
    }

    /// Check and record one request for `identifier`
    pub async fn check(&self, identifier: &str) -> Result<()> {
        let allowed = self
            .redis
            .check_rate_limit(identifier, self.max_requests, self.window_seconds)
            .await?;

        if allowed {
            debug!(identifier = %identifier, "Rate limit check passed");
            Ok(())
        } else {
            warn!(identifier = %identifier, "Rate limit exceeded");
            Err(TourbookError::RateLimitExceeded)
        }
    }
}
