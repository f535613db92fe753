//! Error handling for Tourbook
//!
//! This module defines the main error types used throughout the application
//! and maps them onto HTTP responses for the API surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for the Tourbook application
#[derive(Error, Debug)]
pub enum TourbookError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Payment processor error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Tour not found: {0}")]
    TourNotFound(String),

    #[error("Departure not found: {departure_id}")]
    DepartureNotFound { departure_id: i64 },

    #[error("Booking not found: {reference}")]
    BookingNotFound { reference: String },

    #[error("Checkout session not found or expired")]
    SessionNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Departure is sold out: requested {requested}, {available} left")]
    SoldOut { requested: i32, available: i32 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Payment processor specific errors
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment request failed: {0}")]
    RequestFailed(String),

    #[error("Payment was declined: {0}")]
    Declined(String),

    #[error("Invalid processor response: {0}")]
    InvalidResponse(String),

    #[error("Payment processor unavailable")]
    ServiceUnavailable,
}

/// Result type alias for Tourbook operations
pub type Result<T> = std::result::Result<T, TourbookError>;

/// Result type alias for payment operations
pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

impl TourbookError {
    /// HTTP status code this error maps to at the API boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            TourbookError::TourNotFound(_)
            | TourbookError::DepartureNotFound { .. }
            | TourbookError::BookingNotFound { .. }
            | TourbookError::NotFound(_) => StatusCode::NOT_FOUND,
            TourbookError::SessionNotFound => StatusCode::GONE,
            TourbookError::SoldOut { .. } => StatusCode::CONFLICT,
            TourbookError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
            TourbookError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TourbookError::Authentication(_) | TourbookError::Token(_) => StatusCode::UNAUTHORIZED,
            TourbookError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            TourbookError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            TourbookError::Payment(PaymentError::Declined(_)) => StatusCode::PAYMENT_REQUIRED,
            TourbookError::Payment(_) | TourbookError::Http(_) => StatusCode::BAD_GATEWAY,
            TourbookError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if the error is recoverable by retrying the request
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TourbookError::Redis(_)
                | TourbookError::Http(_)
                | TourbookError::RateLimitExceeded
                | TourbookError::ServiceUnavailable(_)
                | TourbookError::Payment(PaymentError::ServiceUnavailable)
        )
    }
}

impl IntoResponse for TourbookError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal detail stays in the logs, not in the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal error while handling request");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = TourbookError::BookingNotFound {
            reference: "TB-1234".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_sold_out_maps_to_conflict() {
        let err = TourbookError::SoldOut {
            requested: 4,
            available: 1,
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_declined_payment_maps_to_402() {
        let err = TourbookError::Payment(PaymentError::Declined("INSTRUMENT_DECLINED".into()));
        assert_eq!(err.status_code(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_processor_outage_is_recoverable() {
        let err = TourbookError::Payment(PaymentError::ServiceUnavailable);
        assert!(err.is_recoverable());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
