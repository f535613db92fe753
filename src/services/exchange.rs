//! Exchange-rate service implementation
//!
//! Serves display rates for the storefront currency switcher. Rates are
//! fetched from an external API and cached in redis; they are never applied
//! to the authoritative charge amount.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ExchangeConfig;
use crate::services::redis::RedisService;
use crate::utils::errors::{Result, TourbookError};

#[derive(Debug, Clone, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// A display rate relative to the base currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base: String,
    pub currency: String,
    pub rate: f64,
}

/// Exchange-rate fetcher with redis caching
#[derive(Debug, Clone)]
pub struct ExchangeService {
    client: Client,
    redis: RedisService,
    config: ExchangeConfig,
}

impl ExchangeService {
    /// Create a new ExchangeService instance
    pub fn new(redis: RedisService, config: ExchangeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("Tourbook/1.0")
            .build()
            .map_err(TourbookError::Http)?;

        Ok(Self { client, redis, config })
    }

    pub fn base_currency(&self) -> &str {
        &self.config.base_currency
    }

    /// Display rate for one currency, cache-first
    pub async fn rate(&self, currency: &str) -> Result<ExchangeRate> {
        let currency = currency.to_uppercase();
        if currency == self.config.base_currency {
            return Ok(ExchangeRate {
                base: self.config.base_currency.clone(),
                currency,
                rate: 1.0,
            });
        }

        let rates = self.all_rates().await?;
        let rate = rates.get(&currency).copied().ok_or_else(|| {
            TourbookError::InvalidInput(format!("Unknown currency: {}", currency))
        })?;

        Ok(ExchangeRate {
            base: self.config.base_currency.clone(),
            currency,
            rate,
        })
    }

    /// Full rate table, cache-first
    async fn all_rates(&self) -> Result<HashMap<String, f64>> {
        let cache_key = format!("exchange:{}", self.config.base_currency);
        if let Some(cached) = self.redis.get::<HashMap<String, f64>>(&cache_key).await? {
            debug!(base = %self.config.base_currency, "Serving cached exchange rates");
            return Ok(cached);
        }

        let response = self
            .client
            .get(format!(
                "{}/latest/{}",
                self.config.api_url, self.config.base_currency
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Exchange-rate API request failed");
            return Err(TourbookError::ServiceUnavailable(
                "exchange-rate API unavailable".to_string(),
            ));
        }

        let parsed: RatesResponse = response.json().await?;
        self.redis
            .set(&cache_key, &parsed.rates, Some(self.config.cache_ttl_seconds))
            .await?;

        Ok(parsed.rates)
    }
}
