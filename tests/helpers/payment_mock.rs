//! Mock payment processor
//!
//! Simulates the processor's OAuth token, order creation, and capture
//! endpoints with configurable outcomes.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct PaymentMock {
    pub server: MockServer,
}

impl PaymentMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Token endpoint answering with `access_token`, expected `calls` times
    pub async fn mock_token(&self, access_token: &str, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": access_token,
                "token_type": "Bearer",
                "expires_in": 3600,
            })))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Order creation answering with `order_id`; asserts the invoice id
    /// and formatted amount in the request body
    pub async fn mock_create_order(&self, order_id: &str, invoice_id: &str, amount: &str) {
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .and(body_partial_json(json!({
                "intent": "CAPTURE",
                "purchase_units": [{
                    "invoice_id": invoice_id,
                    "amount": { "currency_code": "USD", "value": amount }
                }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": order_id,
                "status": "CREATED",
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_create_order_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_capture_completed(&self, order_id: &str, capture_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v2/checkout/orders/{}/capture", order_id)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": order_id,
                "status": "COMPLETED",
                "purchase_units": [{
                    "payments": { "captures": [{ "id": capture_id }] }
                }]
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_capture_declined(&self, order_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v2/checkout/orders/{}/capture", order_id)))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "name": "UNPROCESSABLE_ENTITY",
                "details": [{ "issue": "INSTRUMENT_DECLINED" }],
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_capture_incomplete(&self, order_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v2/checkout/orders/{}/capture", order_id)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": order_id,
                "status": "PENDING",
                "purchase_units": [],
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_capture_server_error(&self, order_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v2/checkout/orders/{}/capture", order_id)))
            .respond_with(ResponseTemplate::new(503))
            .mount(&self.server)
            .await;
    }
}
