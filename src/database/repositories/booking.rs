//! Booking repository implementation
//!
//! Owns the two pieces of SQL the rest of the system must never duplicate:
//! the conditional seat decrement that runs in the same transaction as the
//! booking insert, and the guarded pending->terminal transition that
//! releases seats exactly once.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::booking::{
    Booking, BookingAddon, BookingFilter, BookingStatus, BookingTraveler, TravelerDetails,
};
use crate::utils::errors::TourbookError;
use crate::utils::helpers::calculate_offset;

const BOOKING_COLUMNS: &str = "id, reference, tour_id, departure_id, user_id, contact_name, contact_email, contact_phone, room_option_id, travelers_count, status, per_person_cents, room_supplement_cents, kitty_cents, addons_cents, donation_cents, total_cents, currency, payment_order_id, payment_capture_id, expires_at, created_at, updated_at";

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Everything needed to persist a booking in one transaction
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub reference: String,
    pub tour_id: i64,
    pub departure_id: i64,
    pub user_id: Option<i64>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub room_option_id: Option<i64>,
    pub travelers: Vec<TravelerDetails>,
    /// (addon_id, name, unit_price_cents, quantity) frozen at booking time
    pub addon_lines: Vec<(i64, String, i64, i32)>,
    pub per_person_cents: i64,
    pub room_supplement_cents: i64,
    pub kitty_cents: i64,
    pub addons_cents: i64,
    pub donation_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending booking, reserving seats on the departure.
    ///
    /// The seat decrement is conditional on availability and departure
    /// status; when it matches no row the transaction rolls back and the
    /// caller gets `SoldOut` with the remaining count (or a not-found error
    /// when the departure is missing or closed).
    pub async fn create_pending(&self, new: NewBooking) -> Result<Booking, TourbookError> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;

        let reserved: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE tour_departures
            SET available_spaces = available_spaces - $2, updated_at = $3
            WHERE id = $1 AND status = 'open' AND available_spaces >= $2
            RETURNING available_spaces
            "#,
        )
        .bind(new.departure_id)
        .bind(new.travelers.len() as i32)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        if reserved.is_none() {
            let available: Option<(i32,)> = sqlx::query_as(
                "SELECT available_spaces FROM tour_departures WHERE id = $1 AND status = 'open'",
            )
            .bind(new.departure_id)
            .fetch_optional(&mut *tx)
            .await?;
            tx.rollback().await?;

            return match available {
                Some((available,)) => Err(TourbookError::SoldOut {
                    requested: new.travelers.len() as i32,
                    available,
                }),
                None => Err(TourbookError::DepartureNotFound {
                    departure_id: new.departure_id,
                }),
            };
        }

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (reference, tour_id, departure_id, user_id, contact_name, contact_email, contact_phone, room_option_id, travelers_count, status, per_person_cents, room_supplement_cents, kitty_cents, addons_cents, donation_cents, total_cents, currency, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $11, $12, $13, $14, $15, $16, $17, $18, $18)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(&new.reference)
        .bind(new.tour_id)
        .bind(new.departure_id)
        .bind(new.user_id)
        .bind(&new.contact_name)
        .bind(&new.contact_email)
        .bind(&new.contact_phone)
        .bind(new.room_option_id)
        .bind(new.travelers.len() as i32)
        .bind(new.per_person_cents)
        .bind(new.room_supplement_cents)
        .bind(new.kitty_cents)
        .bind(new.addons_cents)
        .bind(new.donation_cents)
        .bind(new.total_cents)
        .bind(&new.currency)
        .bind(new.expires_at)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for traveler in &new.travelers {
            sqlx::query(
                "INSERT INTO booking_travelers (booking_id, full_name, date_of_birth, passport_number) VALUES ($1, $2, $3, $4)",
            )
            .bind(booking.id)
            .bind(&traveler.full_name)
            .bind(traveler.date_of_birth)
            .bind(&traveler.passport_number)
            .execute(&mut *tx)
            .await?;
        }

        for (addon_id, name, unit_price_cents, quantity) in &new.addon_lines {
            sqlx::query(
                "INSERT INTO booking_addons (booking_id, addon_id, name, unit_price_cents, quantity) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(booking.id)
            .bind(addon_id)
            .bind(name)
            .bind(unit_price_cents)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(booking)
    }

    /// Find booking by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, TourbookError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Find booking by its human-readable reference
    pub async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, TourbookError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE reference = $1"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Travelers attached to a booking
    pub async fn list_travelers(&self, booking_id: i64) -> Result<Vec<BookingTraveler>, TourbookError> {
        let travelers = sqlx::query_as::<_, BookingTraveler>(
            "SELECT id, booking_id, full_name, date_of_birth, passport_number FROM booking_travelers WHERE booking_id = $1 ORDER BY id ASC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(travelers)
    }

    /// Add-on lines attached to a booking
    pub async fn list_addons(&self, booking_id: i64) -> Result<Vec<BookingAddon>, TourbookError> {
        let addons = sqlx::query_as::<_, BookingAddon>(
            "SELECT id, booking_id, addon_id, name, unit_price_cents, quantity FROM booking_addons WHERE booking_id = $1 ORDER BY id ASC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(addons)
    }

    /// Record the upstream order id on a pending booking
    pub async fn set_payment_order(&self, id: i64, order_id: &str) -> Result<Booking, TourbookError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET payment_order_id = $2, updated_at = $3 WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(order_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Mark a pending booking paid, keeping its seats.
    ///
    /// Returns `None` when the booking was not pending, which callers use
    /// for idempotent capture handling.
    pub async fn mark_paid(&self, id: i64, capture_id: &str) -> Result<Option<Booking>, TourbookError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'paid', payment_capture_id = $2, expires_at = NULL, updated_at = $3
            WHERE id = $1 AND status = 'pending'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(capture_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Move a pending booking to a terminal state and release its seats.
    ///
    /// The status guard makes the release idempotent: a second call matches
    /// no row and touches nothing.
    pub async fn release_to(&self, id: i64, to: BookingStatus) -> Result<Option<Booking>, TourbookError> {
        debug_assert!(matches!(
            to,
            BookingStatus::Failed | BookingStatus::Cancelled | BookingStatus::Expired
        ));

        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = 'pending'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(to.as_str())
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(ref booking) = booking {
            sqlx::query(
                r#"
                UPDATE tour_departures
                SET available_spaces = LEAST(total_spaces, available_spaces + $2), updated_at = $3
                WHERE id = $1
                "#,
            )
            .bind(booking.departure_id)
            .bind(booking.travelers_count)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(booking)
    }

    /// Cancel a paid booking (admin refund path); seats are released
    pub async fn cancel_paid(&self, id: i64) -> Result<Option<Booking>, TourbookError> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET status = 'cancelled', updated_at = $2 WHERE id = $1 AND status = 'paid' RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(ref booking) = booking {
            sqlx::query(
                "UPDATE tour_departures SET available_spaces = LEAST(total_spaces, available_spaces + $2), updated_at = $3 WHERE id = $1",
            )
            .bind(booking.departure_id)
            .bind(booking.travelers_count)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(booking)
    }

    /// Pending bookings whose hold window has lapsed
    pub async fn list_expired_pending(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Booking>, TourbookError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = 'pending' AND expires_at IS NOT NULL AND expires_at < $1 ORDER BY expires_at ASC LIMIT $2"
        ))
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// List bookings for the admin screen
    pub async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, TourbookError> {
        let page_size = filter
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = calculate_offset(filter.page.unwrap_or(1), page_size);

        let bookings = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::bigint IS NULL OR tour_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.tour_id)
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Booking counts grouped by status
    pub async fn count_by_status(&self) -> Result<Vec<(String, i64)>, TourbookError> {
        let counts: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM bookings GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        Ok(counts)
    }

    /// Total captured revenue in minor units
    pub async fn paid_revenue_cents(&self) -> Result<i64, TourbookError> {
        let total: (Option<i64>,) =
            sqlx::query_as("SELECT SUM(total_cents) FROM bookings WHERE status = 'paid'")
                .fetch_one(&self.pool)
                .await?;

        Ok(total.0.unwrap_or(0))
    }

    /// Paid-booking counts and revenue per tour, best sellers first
    pub async fn top_tours(&self, limit: i64) -> Result<Vec<(i64, i64, i64)>, TourbookError> {
        let rows: Vec<(i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT tour_id, COUNT(*), SUM(total_cents)
            FROM bookings
            WHERE status = 'paid'
            GROUP BY tour_id
            ORDER BY COUNT(*) DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
