//! OTP service for the booking lookup flow
//!
//! A customer who wants to see their booking supplies the booking reference
//! and contact email. A one-time code is generated and stored in redis under
//! a digest of both values; verifying it consumes the code and yields a
//! short-lived manage token for that booking.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::BookingConfig;
use crate::services::auth::AuthService;
use crate::services::redis::RedisService;
use crate::utils::errors::{Result, TourbookError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredOtp {
    code: String,
    booking_id: i64,
    attempts: u32,
}

/// OTP generation and verification
#[derive(Debug, Clone)]
pub struct OtpService {
    redis: RedisService,
    auth: AuthService,
    config: BookingConfig,
}

impl OtpService {
    pub fn new(redis: RedisService, auth: AuthService, config: BookingConfig) -> Self {
        Self { redis, auth, config }
    }

    fn otp_key(reference: &str, email: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(reference.as_bytes());
        hasher.update(b":");
        hasher.update(email.to_lowercase().as_bytes());
        format!("otp:{}", hex::encode(hasher.finalize()))
    }

    /// Generate a 6-digit code for a booking and store it with TTL.
    ///
    /// Delivery (email) is deployment glue; the code is written to the log
    /// at info level so operators can relay it in development setups.
    pub async fn issue(&self, reference: &str, email: &str, booking_id: i64) -> Result<()> {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let key = Self::otp_key(reference, email);

        let stored = StoredOtp {
            code: code.clone(),
            booking_id,
            attempts: 0,
        };
        self.redis
            .set(&key, &stored, Some(self.config.otp_ttl_seconds))
            .await?;

        info!(
            reference = reference,
            booking_id = booking_id,
            code = %code,
            "OTP issued for booking lookup"
        );
        Ok(())
    }

    /// Verify a code; on success the code is consumed and a manage token
    /// for the booking is returned.
    ///
    /// Wrong codes burn an attempt; once attempts are exhausted the code is
    /// deleted. Every failure returns the same generic error so the
    /// endpoint does not reveal which input was wrong.
    pub async fn verify(&self, reference: &str, email: &str, code: &str) -> Result<(i64, String)> {
        let key = Self::otp_key(reference, email);

        let Some(mut stored) = self.redis.get::<StoredOtp>(&key).await? else {
            return Err(Self::generic_failure());
        };

        if stored.code != code {
            stored.attempts += 1;
            if stored.attempts >= self.config.otp_max_attempts {
                warn!(reference = reference, "OTP attempts exhausted, invalidating code");
                self.redis.delete(&key).await?;
            } else {
                // Keep the original expiry; a failed guess must not
                // prolong the code's lifetime.
                let remaining = self.redis.ttl(&key).await?.unwrap_or(1).max(1);
                self.redis.set(&key, &stored, Some(remaining)).await?;
            }
            return Err(Self::generic_failure());
        }

        self.redis.delete(&key).await?;
        let token = self.auth.issue_manage_token(stored.booking_id)?;
        info!(reference = reference, booking_id = stored.booking_id, "OTP verified");
        Ok((stored.booking_id, token))
    }

    fn generic_failure() -> TourbookError {
        TourbookError::Authentication("Invalid reference, email, or code".to_string())
    }
}
