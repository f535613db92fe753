//! Booking service implementation
//!
//! Orchestrates the end of checkout: recomputing the authoritative quote
//! from persisted prices, creating the pending booking with its seat hold,
//! driving the order-then-capture handshake, and sweeping expired holds.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::config::BookingConfig;
use crate::database::{DatabaseService, NewBooking};
use crate::models::booking::{Booking, BookingStatus};
use crate::models::departure::RoomOption;
use crate::models::tour::TourAddon;
use crate::services::payment::PaymentService;
use crate::services::pricing::{PriceQuote, PricingService};
use crate::state::wizard::CheckoutSession;
use crate::utils::errors::{Result, TourbookError};
use crate::utils::helpers::generate_booking_reference;
use crate::utils::logging::{log_booking_transition, log_payment_event};

/// Booking lifecycle orchestration
#[derive(Debug, Clone)]
pub struct BookingService {
    db: DatabaseService,
    pricing: PricingService,
    payment: PaymentService,
    config: BookingConfig,
}

impl BookingService {
    pub fn new(
        db: DatabaseService,
        pricing: PricingService,
        payment: PaymentService,
        config: BookingConfig,
    ) -> Self {
        Self {
            db,
            pricing,
            payment,
            config,
        }
    }

    /// Recompute the quote for a checkout session from persisted prices.
    ///
    /// Client-supplied amounts are never trusted; everything is re-read
    /// from the database.
    pub async fn quote_session(&self, session: &CheckoutSession) -> Result<PriceQuote> {
        let tour = self
            .db
            .tours
            .find_by_id(session.tour_id)
            .await?
            .ok_or_else(|| TourbookError::TourNotFound(session.tour_id.to_string()))?;
        let departure = self
            .db
            .departures
            .find_by_id(session.departure_id)
            .await?
            .ok_or(TourbookError::DepartureNotFound {
                departure_id: session.departure_id,
            })?;

        let room_option = self.resolve_room_option(session).await?;
        let addons = self.resolve_addons(session).await?;

        self.pricing.quote(
            &tour,
            &departure,
            session.travelers.len() as i32,
            room_option.as_ref(),
            &addons,
            session.donation_cents,
        )
    }

    /// Create the pending booking and the upstream payment order.
    ///
    /// Seats are reserved in the booking transaction. If the processor
    /// rejects order creation afterwards, the hold is released immediately
    /// rather than waiting for the expiry sweep.
    pub async fn begin_payment(&self, session: &CheckoutSession) -> Result<(Booking, String)> {
        let quote = self.quote_session(session).await?;
        let contact = session.contact.as_ref().ok_or_else(|| {
            TourbookError::InvalidInput("Checkout session has no contact details".to_string())
        })?;

        let addon_lines = quote
            .addon_lines
            .iter()
            .map(|line| {
                (
                    line.addon_id,
                    line.name.clone(),
                    line.unit_price_cents,
                    line.quantity,
                )
            })
            .collect();

        let new = NewBooking {
            reference: generate_booking_reference(),
            tour_id: session.tour_id,
            departure_id: session.departure_id,
            user_id: session.user_id,
            contact_name: contact.full_name.clone(),
            contact_email: contact.email.clone(),
            contact_phone: contact.phone.clone(),
            room_option_id: session.room_option_id,
            travelers: session.travelers.clone(),
            addon_lines,
            per_person_cents: quote.per_person_cents,
            room_supplement_cents: quote.room_supplement_cents,
            kitty_cents: quote.kitty_cents,
            addons_cents: quote.addons_cents,
            donation_cents: quote.donation_cents,
            total_cents: quote.total_cents,
            currency: quote.currency.clone(),
            expires_at: Utc::now() + Duration::minutes(self.config.hold_minutes),
        };

        let booking = self.db.bookings.create_pending(new).await?;
        info!(
            booking_id = booking.id,
            reference = %booking.reference,
            total_cents = booking.total_cents,
            "Pending booking created, seats reserved"
        );

        let order_id = match self
            .payment
            .create_order(&booking.reference, booking.total_cents)
            .await
        {
            Ok(order_id) => order_id,
            Err(e) => {
                warn!(booking_id = booking.id, error = %e, "Order creation failed, releasing hold");
                self.db
                    .bookings
                    .release_to(booking.id, BookingStatus::Failed)
                    .await?;
                return Err(e);
            }
        };

        let booking = self.db.bookings.set_payment_order(booking.id, &order_id).await?;
        log_payment_event(booking.id, &order_id, "order_created", true);
        Ok((booking, order_id))
    }

    /// Capture an approved order and mark the booking paid.
    ///
    /// Idempotent per booking: a booking already paid returns immediately.
    /// Capture failure releases the seat hold and marks the booking failed.
    pub async fn capture(&self, booking_id: i64, order_id: &str) -> Result<Booking> {
        let booking = self
            .db
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| TourbookError::BookingNotFound {
                reference: booking_id.to_string(),
            })?;

        match BookingStatus::parse(&booking.status) {
            Some(BookingStatus::Paid) => {
                info!(booking_id = booking.id, "Capture retried on paid booking, no-op");
                return Ok(booking);
            }
            Some(BookingStatus::Pending) => {}
            _ => {
                return Err(TourbookError::InvalidStateTransition {
                    from: booking.status.clone(),
                    to: BookingStatus::Paid.to_string(),
                });
            }
        }

        if booking.payment_order_id.as_deref() != Some(order_id) {
            return Err(TourbookError::InvalidInput(
                "Order id does not match booking".to_string(),
            ));
        }

        match self.payment.capture_order(order_id).await {
            Ok(result) => {
                log_payment_event(booking.id, order_id, "captured", true);
                let paid = self
                    .db
                    .bookings
                    .mark_paid(booking.id, &result.capture_id)
                    .await?;
                match paid {
                    Some(paid) => {
                        log_booking_transition(paid.id, "pending", "paid", None);
                        Ok(paid)
                    }
                    // Lost the race with the expiry sweep; funds were taken
                    // for a released hold, surface loudly.
                    None => {
                        warn!(
                            booking_id = booking.id,
                            capture_id = %result.capture_id,
                            "Capture succeeded but booking left pending state concurrently"
                        );
                        Err(TourbookError::InvalidStateTransition {
                            from: BookingStatus::Pending.to_string(),
                            to: BookingStatus::Paid.to_string(),
                        })
                    }
                }
            }
            Err(e) => {
                log_payment_event(booking.id, order_id, "capture_failed", false);
                if let Some(failed) = self
                    .db
                    .bookings
                    .release_to(booking.id, BookingStatus::Failed)
                    .await?
                {
                    log_booking_transition(failed.id, "pending", "failed", None);
                }
                Err(e)
            }
        }
    }

    /// Cancel a booking; pending and paid bookings both release seats
    pub async fn cancel(&self, booking_id: i64) -> Result<Booking> {
        if let Some(cancelled) = self
            .db
            .bookings
            .release_to(booking_id, BookingStatus::Cancelled)
            .await?
        {
            log_booking_transition(cancelled.id, "pending", "cancelled", None);
            return Ok(cancelled);
        }
        if let Some(cancelled) = self.db.bookings.cancel_paid(booking_id).await? {
            log_booking_transition(cancelled.id, "paid", "cancelled", None);
            return Ok(cancelled);
        }

        let booking = self
            .db
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| TourbookError::BookingNotFound {
                reference: booking_id.to_string(),
            })?;
        Err(TourbookError::InvalidStateTransition {
            from: booking.status,
            to: BookingStatus::Cancelled.to_string(),
        })
    }

    /// Expire pending bookings whose hold window has lapsed.
    ///
    /// Returns how many bookings were expired. Run periodically from the
    /// sweep task in main.
    pub async fn expire_stale_holds(&self) -> Result<u64> {
        let stale = self.db.bookings.list_expired_pending(Utc::now(), 100).await?;
        let mut expired = 0u64;
        for booking in stale {
            if let Some(booking) = self
                .db
                .bookings
                .release_to(booking.id, BookingStatus::Expired)
                .await?
            {
                log_booking_transition(booking.id, "pending", "expired", Some("hold lapsed"));
                expired += 1;
            }
        }
        if expired > 0 {
            info!(expired = expired, "Expired stale booking holds");
        }
        Ok(expired)
    }

    async fn resolve_room_option(&self, session: &CheckoutSession) -> Result<Option<RoomOption>> {
        let Some(room_option_id) = session.room_option_id else {
            return Ok(None);
        };
        let room = self
            .db
            .departures
            .find_room_option(room_option_id)
            .await?
            .filter(|r| r.tour_id == session.tour_id && r.is_active)
            .ok_or_else(|| {
                TourbookError::InvalidInput("Unknown room option for this tour".to_string())
            })?;
        Ok(Some(room))
    }

    async fn resolve_addons(&self, session: &CheckoutSession) -> Result<Vec<(TourAddon, i32)>> {
        let mut addons = Vec::with_capacity(session.addons.len());
        for selection in &session.addons {
            let addon = self
                .db
                .tours
                .find_addon(selection.addon_id)
                .await?
                .filter(|a| a.tour_id == session.tour_id && a.is_active)
                .ok_or_else(|| {
                    TourbookError::InvalidInput("Unknown add-on for this tour".to_string())
                })?;
            addons.push((addon, selection.quantity));
        }
        Ok(addons)
    }
}
