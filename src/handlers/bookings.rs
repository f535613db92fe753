//! Customer booking lookup handlers
//!
//! Lookup is gated by a one-time code emailed to the booking contact.
//! Responses never reveal whether a reference or email exists; both the
//! request and verify endpoints are rate limited per reference.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::middleware::BearerToken;
use crate::models::booking::{Booking, BookingDetail};
use crate::utils::errors::{Result, TourbookError};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub reference: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub reference: String,
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub booking_id: i64,
    pub manage_token: String,
}

/// Request a one-time code for a booking.
///
/// Always answers 200 with a generic body so the endpoint cannot be used
/// to probe which references exist.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<serde_json::Value>> {
    let reference = request.reference.trim().to_uppercase();
    state
        .otp_limiter
        .check(&format!("otp:request:{}", reference))
        .await?;

    match state.db.bookings.find_by_reference(&reference).await? {
        Some(booking)
            if booking.contact_email.eq_ignore_ascii_case(request.email.trim()) =>
        {
            state
                .services
                .otp_service
                .issue(&reference, request.email.trim(), booking.id)
                .await?;
        }
        _ => {
            debug!(reference = %reference, "Booking lookup with unknown reference or email");
        }
    }

    Ok(Json(json!({ "status": "ok" })))
}

/// Verify a one-time code and get a manage token for the booking
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let reference = request.reference.trim().to_uppercase();
    state
        .otp_limiter
        .check(&format!("otp:verify:{}", reference))
        .await?;

    let (booking_id, manage_token) = state
        .services
        .otp_service
        .verify(&reference, request.email.trim(), request.code.trim())
        .await?;

    Ok(Json(VerifyResponse {
        booking_id,
        manage_token,
    }))
}

/// Full booking detail, gated by a manage token for this booking
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    BearerToken(token): BearerToken,
) -> Result<Json<BookingDetail>> {
    state.services.auth_service.verify_manage_token(&token, id)?;

    let detail = state
        .db
        .booking_detail(id)
        .await?
        .ok_or_else(|| TourbookError::BookingNotFound {
            reference: id.to_string(),
        })?;

    Ok(Json(detail))
}

/// Cancel a booking, releasing its seats
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    BearerToken(token): BearerToken,
) -> Result<Json<Booking>> {
    state.services.auth_service.verify_manage_token(&token, id)?;

    let booking = state.services.booking_service.cancel(id).await?;
    Ok(Json(booking))
}
