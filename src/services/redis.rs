//! Redis integration service implementation
//!
//! This service handles caching for exchange rates and payment processor
//! tokens, OTP storage for the booking lookup flow, and fixed-window
//! rate limiting counters.

use redis::{AsyncCommands, Client, RedisResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RedisConfig;
use crate::utils::errors::{Result, TourbookError};

/// Redis service for caching and short-lived state
#[derive(Debug, Clone)]
pub struct RedisService {
    client: Client,
    config: RedisConfig,
}

impl RedisService {
    /// Create a new RedisService instance
    pub fn new(config: RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str()).map_err(TourbookError::Redis)?;

        Ok(Self { client, config })
    }

    /// Get Redis connection
    async fn get_connection(&self) -> Result<redis::aio::Connection> {
        self.client
            .get_async_connection()
            .await
            .map_err(TourbookError::Redis)
    }

    /// Set a value in Redis with TTL
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let mut conn = self.get_connection().await?;
        let serialized = serde_json::to_string(value).map_err(TourbookError::Serialization)?;

        let full_key = format!("{}{}", self.config.prefix, key);
        let ttl = ttl_seconds.unwrap_or(self.config.ttl_seconds);

        let _: () = conn
            .set_ex(&full_key, serialized, ttl)
            .await
            .map_err(TourbookError::Redis)?;

        debug!(key = %full_key, ttl = ttl, "Value set in Redis");
        Ok(())
    }

    /// Get a value from Redis
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut conn = self.get_connection().await?;
        let full_key = format!("{}{}", self.config.prefix, key);

        let result: Option<String> = conn.get(&full_key).await.map_err(TourbookError::Redis)?;

        match result {
            Some(data) => {
                let deserialized =
                    serde_json::from_str::<T>(&data).map_err(TourbookError::Serialization)?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// Remaining TTL of a key in seconds; None when the key is missing
    /// or has no expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<u64>> {
        let mut conn = self.get_connection().await?;
        let full_key = format!("{}{}", self.config.prefix, key);

        let ttl: i64 = conn.ttl(&full_key).await.map_err(TourbookError::Redis)?;

        Ok((ttl >= 0).then_some(ttl as u64))
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let full_key = format!("{}{}", self.config.prefix, key);

        let deleted: i32 = conn.del(&full_key).await.map_err(TourbookError::Redis)?;

        Ok(deleted > 0)
    }

    /// Increment a counter with TTL
    pub async fn increment_with_ttl(&self, key: &str, ttl_seconds: u64) -> Result<i64> {
        let mut conn = self.get_connection().await?;
        let full_key = format!("{}{}", self.config.prefix, key);

        // Use a pipeline to ensure atomicity
        let (value,): (i64,) = redis::pipe()
            .incr(&full_key, 1)
            .expire(&full_key, ttl_seconds as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(TourbookError::Redis)?;

        debug!(key = %full_key, value = value, ttl = ttl_seconds, "Counter incremented with TTL");
        Ok(value)
    }

    /// Fixed-window rate limiting check
    pub async fn check_rate_limit(&self, identifier: &str, limit: u64, window_seconds: u64) -> Result<bool> {
        let key = format!("rate_limit:{}", identifier);
        let current_count = self.increment_with_ttl(&key, window_seconds).await?;

        let allowed = current_count <= limit as i64;
        debug!(
            identifier = %identifier,
            current_count = current_count,
            limit = limit,
            allowed = allowed,
            "Rate limit check"
        );

        Ok(allowed)
    }

    /// Health check for Redis connection
    pub async fn health_check(&self) -> Result<bool> {
        match self.get_connection().await {
            Ok(mut conn) => {
                let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
                match result {
                    Ok(response) => Ok(response == "PONG"),
                    Err(e) => {
                        warn!(error = %e, "Redis health check failed");
                        Ok(false)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Redis connection failed");
                Ok(false)
            }
        }
    }
}
