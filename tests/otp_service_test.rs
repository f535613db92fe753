//! OTP booking lookup flow tests
//!
//! These tests exercise issue/verify against a live redis and skip when
//! none is reachable. The stored code is read back through redis directly,
//! standing in for the email delivery channel.

mod helpers;

use helpers::{auth_config, booking_config, redis_service_or_skip};
use sha2::{Digest, Sha256};
use tourbook::services::{AuthService, OtpService};
use tourbook::utils::errors::TourbookError;

fn otp_key(reference: &str, email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reference.as_bytes());
    hasher.update(b":");
    hasher.update(email.to_lowercase().as_bytes());
    format!("otp:{}", hex::encode(hasher.finalize()))
}

async fn stored_code(
    redis: &tourbook::services::RedisService,
    reference: &str,
    email: &str,
) -> Option<String> {
    let value: Option<serde_json::Value> = redis.get(&otp_key(reference, email)).await.unwrap();
    value.and_then(|v| v.get("code").and_then(|c| c.as_str().map(String::from)))
}

#[tokio::test]
async fn test_verify_consumes_code_and_issues_manage_token() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let auth = AuthService::new(auth_config());
    let otp = OtpService::new(redis.clone(), auth.clone(), booking_config());

    otp.issue("TB-TESTREF", "alice@example.com", 77).await.unwrap();
    let code = stored_code(&redis, "TB-TESTREF", "alice@example.com")
        .await
        .expect("code stored");

    let (booking_id, token) = otp
        .verify("TB-TESTREF", "alice@example.com", &code)
        .await
        .unwrap();
    assert_eq!(booking_id, 77);
    assert!(auth.verify_manage_token(&token, 77).is_ok());

    // Single use: the same code must not verify twice.
    let err = otp
        .verify("TB-TESTREF", "alice@example.com", &code)
        .await
        .unwrap_err();
    assert!(matches!(err, TourbookError::Authentication(_)));
}

#[tokio::test]
async fn test_wrong_codes_exhaust_attempts() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let auth = AuthService::new(auth_config());
    let otp = OtpService::new(redis.clone(), auth, booking_config());

    otp.issue("TB-BURNREF", "bob@example.com", 88).await.unwrap();
    let code = stored_code(&redis, "TB-BURNREF", "bob@example.com")
        .await
        .expect("code stored");
    let wrong = if code == "000000" { "000001" } else { "000000" };

    // booking_config allows 3 attempts; burn them all.
    for _ in 0..3 {
        let err = otp
            .verify("TB-BURNREF", "bob@example.com", wrong)
            .await
            .unwrap_err();
        assert!(matches!(err, TourbookError::Authentication(_)));
    }

    // The correct code is now invalidated too.
    let err = otp
        .verify("TB-BURNREF", "bob@example.com", &code)
        .await
        .unwrap_err();
    assert!(matches!(err, TourbookError::Authentication(_)));
}

#[tokio::test]
async fn test_failed_attempt_does_not_extend_code_lifetime() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let auth = AuthService::new(auth_config());
    let otp = OtpService::new(redis.clone(), auth, booking_config());

    otp.issue("TB-TTLREF00", "carol@example.com", 99).await.unwrap();
    let code = stored_code(&redis, "TB-TTLREF00", "carol@example.com")
        .await
        .expect("code stored");
    let wrong = if code == "000000" { "000001" } else { "000000" };

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    let err = otp
        .verify("TB-TTLREF00", "carol@example.com", wrong)
        .await
        .unwrap_err();
    assert!(matches!(err, TourbookError::Authentication(_)));

    // booking_config stores codes for 600 seconds. Time has passed since
    // issue, so a failed attempt must leave the window shorter than the
    // full TTL rather than resetting it.
    let remaining = redis
        .ttl(&otp_key("TB-TTLREF00", "carol@example.com"))
        .await
        .unwrap()
        .expect("code still stored");
    assert!(remaining <= 598, "failed attempt reset the TTL to {}", remaining);

    // The correct code still verifies inside the original window.
    let (booking_id, _) = otp
        .verify("TB-TTLREF00", "carol@example.com", &code)
        .await
        .unwrap();
    assert_eq!(booking_id, 99);
}

#[tokio::test]
async fn test_verify_with_unknown_reference_fails_generically() {
    let Some(redis) = redis_service_or_skip().await else {
        return;
    };
    let auth = AuthService::new(auth_config());
    let otp = OtpService::new(redis, auth, booking_config());

    let err = otp
        .verify("TB-NOSUCH00", "nobody@example.com", "123456")
        .await
        .unwrap_err();
    assert!(matches!(err, TourbookError::Authentication(_)));
}
