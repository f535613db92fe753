//! Payment processor client tests
//!
//! Drive the order/capture handshake against a mock processor. Tests that
//! need the redis token cache skip when no redis server is reachable.

mod helpers;

use assert_matches::assert_matches;
use helpers::{payment_config, redis_service_or_skip, PaymentMock};
use tourbook::services::PaymentService;
use tourbook::utils::errors::{PaymentError, TourbookError};

#[tokio::test]
async fn test_create_order_sends_invoice_and_amount() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let mock = PaymentMock::start().await;
    mock.mock_token("tok-1", 1).await;
    mock.mock_create_order("ORD-100", "TB-A1B2C3D4", "1500.00").await;

    let service = PaymentService::new(redis, payment_config(&mock.uri())).unwrap();
    let order_id = service.create_order("TB-A1B2C3D4", 150_000).await.unwrap();
    assert_eq!(order_id, "ORD-100");
}

#[tokio::test]
async fn test_access_token_is_cached_between_calls() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let mock = PaymentMock::start().await;
    // A single token fetch must serve both order creations.
    mock.mock_token("tok-cached", 1).await;
    mock.mock_create_order("ORD-1", "TB-REF00001", "100.00").await;
    mock.mock_create_order("ORD-1", "TB-REF00002", "200.00").await;

    let service = PaymentService::new(redis, payment_config(&mock.uri())).unwrap();
    service.create_order("TB-REF00001", 10_000).await.unwrap();
    service.create_order("TB-REF00002", 20_000).await.unwrap();
}

#[tokio::test]
async fn test_capture_completed_returns_capture_id() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let mock = PaymentMock::start().await;
    mock.mock_token("tok-1", 1).await;
    mock.mock_capture_completed("ORD-7", "CAP-42").await;

    let service = PaymentService::new(redis, payment_config(&mock.uri())).unwrap();
    let result = service.capture_order("ORD-7").await.unwrap();
    assert_eq!(result.capture_id, "CAP-42");
    assert_eq!(result.status, "COMPLETED");
}

#[tokio::test]
async fn test_capture_client_error_is_declined() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let mock = PaymentMock::start().await;
    mock.mock_token("tok-1", 1).await;
    mock.mock_capture_declined("ORD-8").await;

    let service = PaymentService::new(redis, payment_config(&mock.uri())).unwrap();
    let err = service.capture_order("ORD-8").await.unwrap_err();
    assert_matches!(err, TourbookError::Payment(PaymentError::Declined(_)));
}

#[tokio::test]
async fn test_capture_non_completed_status_is_declined() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let mock = PaymentMock::start().await;
    mock.mock_token("tok-1", 1).await;
    mock.mock_capture_incomplete("ORD-9").await;

    let service = PaymentService::new(redis, payment_config(&mock.uri())).unwrap();
    let err = service.capture_order("ORD-9").await.unwrap_err();
    assert_matches!(err, TourbookError::Payment(PaymentError::Declined(_)));
}

#[tokio::test]
async fn test_capture_server_error_is_request_failure() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let mock = PaymentMock::start().await;
    mock.mock_token("tok-1", 1).await;
    mock.mock_capture_server_error("ORD-10").await;

    let service = PaymentService::new(redis, payment_config(&mock.uri())).unwrap();
    let err = service.capture_order("ORD-10").await.unwrap_err();
    assert_matches!(err, TourbookError::Payment(PaymentError::RequestFailed(_)));
}

#[tokio::test]
async fn test_order_creation_failure_is_request_failure() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let mock = PaymentMock::start().await;
    mock.mock_token("tok-1", 1).await;
    mock.mock_create_order_failure(500).await;

    let service = PaymentService::new(redis, payment_config(&mock.uri())).unwrap();
    let err = service.create_order("TB-REF00003", 5_000).await.unwrap_err();
    assert_matches!(err, TourbookError::Payment(PaymentError::RequestFailed(_)));
}
