//! Payment handlers
//!
//! The order-then-capture handshake: `begin` creates the pending booking
//! with its seat hold and the upstream payment order; after the customer
//! approves the order, `capture` settles it and marks the booking paid.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::utils::errors::{Result, TourbookError};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct BeginPaymentResponse {
    pub booking_id: i64,
    pub reference: String,
    pub order_id: String,
    pub total_cents: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub booking_id: i64,
    pub order_id: String,
}

/// Create the pending booking and the payment order for a ready session
pub async fn begin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BeginPaymentResponse>> {
    if !state.settings.features.payments {
        return Err(TourbookError::ServiceUnavailable(
            "Payments are disabled".to_string(),
        ));
    }

    let session = state
        .sessions
        .load(id)
        .await?
        .ok_or(TourbookError::SessionNotFound)?;
    state.wizard.require_payment_ready(&session)?;

    let (booking, order_id) = state.services.booking_service.begin_payment(&session).await?;

    // The session has served its purpose; the hold now lives on the booking.
    state.sessions.delete(id).await?;

    Ok(Json(BeginPaymentResponse {
        booking_id: booking.id,
        reference: booking.reference,
        order_id,
        total_cents: booking.total_cents,
        currency: booking.currency,
    }))
}

/// Capture an approved order. Retrying after success is a no-op.
pub async fn capture(
    State(state): State<AppState>,
    Json(request): Json<CaptureRequest>,
) -> Result<Json<Booking>> {
    let booking = state
        .services
        .booking_service
        .capture(request.booking_id, &request.order_id)
        .await?;

    Ok(Json(booking))
}
