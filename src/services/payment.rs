//! Payment processor service implementation
//!
//! Thin client for the processor's order/capture REST API. The handshake is
//! two calls: create an order for the booking total, then capture it once
//! the buyer has approved in the embedded widget. Access tokens come from a
//! client-credentials grant and are cached in redis until shortly before
//! they expire.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::PaymentConfig;
use crate::services::redis::RedisService;
use crate::utils::errors::{PaymentError, Result, TourbookError};
use crate::utils::helpers::format_cents;

const TOKEN_CACHE_KEY: &str = "payment:access_token";
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct OrderResponse {
    id: String,
    status: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CaptureResponse {
    status: String,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Clone, Deserialize)]
struct PurchaseUnit {
    #[serde(default)]
    payments: Option<Payments>,
}

#[derive(Debug, Clone, Deserialize)]
struct Payments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Clone, Deserialize)]
struct Capture {
    id: String,
}

/// Outcome of a capture call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResult {
    pub capture_id: String,
    pub status: String,
}

/// Payment processor client
#[derive(Debug, Clone)]
pub struct PaymentService {
    client: Client,
    redis: RedisService,
    config: PaymentConfig,
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(redis: RedisService, config: PaymentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("Tourbook/1.0")
            .build()
            .map_err(TourbookError::Http)?;

        Ok(Self { client, redis, config })
    }

    /// The charge currency every order is denominated in
    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    /// Fetch an access token, using the cached one when still valid
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.redis.get::<String>(TOKEN_CACHE_KEY).await? {
            debug!("Using cached payment access token");
            return Ok(token);
        }

        let mut form = HashMap::new();
        form.insert("grant_type", "client_credentials");

        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.config.api_url))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(|e| Self::transport_error("token request", e))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "Payment token request rejected");
            return Err(PaymentError::RequestFailed(format!(
                "token endpoint returned {}",
                status
            ))
            .into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        let ttl = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS).max(1);
        self.redis
            .set(TOKEN_CACHE_KEY, &token.access_token, Some(ttl))
            .await?;

        Ok(token.access_token)
    }

    /// Create an upstream order for a booking total.
    ///
    /// The amount is the authoritative charge in minor units; the booking
    /// reference travels as the order's invoice id so processor dashboards
    /// can be reconciled against bookings.
    pub async fn create_order(&self, reference: &str, amount_cents: i64) -> Result<String> {
        let token = self.access_token().await?;

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "invoice_id": reference,
                "amount": {
                    "currency_code": self.config.currency,
                    "value": format_cents(amount_cents),
                }
            }]
        });

        let response = self
            .client
            .post(format!("{}/v2/checkout/orders", self.config.api_url))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport_error("create order", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            warn!(status = %status, detail = %detail, "Order creation rejected");
            return Err(PaymentError::RequestFailed(format!(
                "order endpoint returned {}",
                status
            ))
            .into());
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        info!(reference = reference, order_id = %order.id, status = %order.status, "Payment order created");
        Ok(order.id)
    }

    /// Capture an approved order.
    ///
    /// A non-COMPLETED capture status is treated as a decline; transport
    /// errors surface separately so callers can tell outage from refusal.
    pub async fn capture_order(&self, order_id: &str) -> Result<CaptureResult> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(format!(
                "{}/v2/checkout/orders/{}/capture",
                self.config.api_url, order_id
            ))
            .bearer_auth(&token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Self::transport_error("capture order", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(order_id = order_id, status = %status, detail = %detail, "Capture rejected");
            if status.is_client_error() {
                return Err(PaymentError::Declined(detail).into());
            }
            return Err(PaymentError::RequestFailed(format!(
                "capture endpoint returned {}",
                status
            ))
            .into());
        }

        let capture: CaptureResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        if capture.status != "COMPLETED" {
            warn!(order_id = order_id, status = %capture.status, "Capture not completed");
            return Err(PaymentError::Declined(capture.status).into());
        }

        let capture_id = capture
            .purchase_units
            .first()
            .and_then(|u| u.payments.as_ref())
            .and_then(|p| p.captures.first())
            .map(|c| c.id.clone())
            .ok_or_else(|| {
                PaymentError::InvalidResponse("capture id missing from response".to_string())
            })?;

        info!(order_id = order_id, capture_id = %capture_id, "Payment captured");
        Ok(CaptureResult {
            capture_id,
            status: capture.status,
        })
    }

    fn transport_error(context: &str, error: reqwest::Error) -> TourbookError {
        warn!(context = context, error = %error, "Payment processor unreachable");
        if error.is_timeout() || error.is_connect() {
            PaymentError::ServiceUnavailable.into()
        } else {
            TourbookError::Http(error)
        }
    }
}
