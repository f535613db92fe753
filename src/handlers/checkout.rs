//! Checkout wizard handlers
//!
//! Each step endpoint loads the session from Redis, applies the wizard
//! transition, and saves it back. All prices shown along the way are
//! recomputed server-side; nothing monetary is taken from the client.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::models::booking::{AddonSelection, ContactDetails, TravelerDetails};
use crate::models::departure::DepartureStatus;
use crate::services::PriceQuote;
use crate::state::{CheckoutSession, CheckoutStep};
use crate::utils::errors::{Result, TourbookError};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct StartCheckoutRequest {
    pub tour_id: i64,
    pub departure_id: i64,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TravelersRequest {
    pub travelers: Vec<TravelerDetails>,
    pub contact: ContactDetails,
}

#[derive(Debug, Deserialize)]
pub struct ExtrasRequest {
    pub room_option_id: Option<i64>,
    #[serde(default)]
    pub addons: Vec<AddonSelection>,
    #[serde(default)]
    pub donation_cents: i64,
}

/// Session state returned to the client after every step
#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: CheckoutSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<PriceQuote>,
}

/// Start a checkout for one departure of a published tour
pub async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartCheckoutRequest>,
) -> Result<Json<SessionView>> {
    let tour = state
        .db
        .tours
        .find_by_id(request.tour_id)
        .await?
        .filter(|t| t.is_published)
        .ok_or_else(|| TourbookError::TourNotFound(request.tour_id.to_string()))?;

    let departure = state
        .db
        .departures
        .find_by_id(request.departure_id)
        .await?
        .filter(|d| d.tour_id == tour.id)
        .ok_or(TourbookError::DepartureNotFound {
            departure_id: request.departure_id,
        })?;

    if departure.status != DepartureStatus::Open.as_str() {
        return Err(TourbookError::InvalidInput(
            "Departure is not open for booking".to_string(),
        ));
    }

    let session = state.wizard.start(tour.id, departure.id, request.user_id);
    state.sessions.save(&session).await?;

    info!(session_id = %session.id, tour_id = tour.id, departure_id = departure.id,
          "Checkout started");
    Ok(Json(SessionView {
        session,
        quote: None,
    }))
}

/// Fetch the current session state
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let session = load_session(&state, id).await?;
    let quote = quote_if_ready(&state, &session).await?;
    Ok(Json(SessionView { session, quote }))
}

/// Travelers step: names and contact details
pub async fn set_travelers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TravelersRequest>,
) -> Result<Json<SessionView>> {
    let mut session = load_session(&state, id).await?;
    state
        .wizard
        .set_travelers(&mut session, request.travelers, request.contact)?;
    state.sessions.save(&session).await?;

    Ok(Json(SessionView {
        session,
        quote: None,
    }))
}

/// Extras step: room option, add-ons, and optional donation
pub async fn set_extras(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ExtrasRequest>,
) -> Result<Json<SessionView>> {
    let mut session = load_session(&state, id).await?;
    state.wizard.set_extras(
        &mut session,
        request.room_option_id,
        request.addons,
        request.donation_cents,
    )?;

    // Validate the selections against the catalogue before persisting so
    // the review step cannot show a quote that begin_payment would reject.
    let quote = state
        .services
        .booking_service
        .quote_session(&session)
        .await?;
    state.sessions.save(&session).await?;

    Ok(Json(SessionView {
        session,
        quote: Some(quote),
    }))
}

/// Review step: the customer confirms the itemized quote
pub async fn confirm_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let mut session = load_session(&state, id).await?;
    state.wizard.confirm_review(&mut session)?;

    let quote = state
        .services
        .booking_service
        .quote_session(&session)
        .await?;
    state.sessions.save(&session).await?;

    Ok(Json(SessionView {
        session,
        quote: Some(quote),
    }))
}

async fn load_session(state: &AppState, id: Uuid) -> Result<CheckoutSession> {
    state
        .sessions
        .load(id)
        .await?
        .ok_or(TourbookError::SessionNotFound)
}

async fn quote_if_ready(state: &AppState, session: &CheckoutSession) -> Result<Option<PriceQuote>> {
    if session.step == CheckoutStep::Review || session.step == CheckoutStep::Payment {
        let quote = state
            .services
            .booking_service
            .quote_session(session)
            .await?;
        Ok(Some(quote))
    } else {
        Ok(None)
    }
}
