//! Booking models
//!
//! A booking is created in `pending` state when checkout reaches payment.
//! Pending is the only state that holds seats on a departure; every
//! transition out of pending either keeps them (paid) or releases them
//! (failed, cancelled, expired).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    /// Human-readable reference used in the OTP lookup flow
    pub reference: String,
    pub tour_id: i64,
    pub departure_id: i64,
    pub user_id: Option<i64>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub room_option_id: Option<i64>,
    pub travelers_count: i32,
    pub status: String,
    /// Itemized totals, all in minor units of `currency`
    pub per_person_cents: i64,
    pub room_supplement_cents: i64,
    pub kitty_cents: i64,
    pub addons_cents: i64,
    pub donation_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    /// Order id at the payment processor, set when the upstream order is created
    pub payment_order_id: Option<String>,
    /// Capture id at the payment processor, set when funds are captured
    pub payment_capture_id: Option<String>,
    /// Pending bookings past this instant are expired by the sweep task
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingTraveler {
    pub id: i64,
    pub booking_id: i64,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub passport_number: Option<String>,
}

/// Purchased add-on line frozen at booking time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingAddon {
    pub id: i64,
    pub booking_id: i64,
    pub addon_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Paid => "paid",
            BookingStatus::Failed => "failed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(BookingStatus::Pending),
            "paid" => Some(BookingStatus::Paid),
            "failed" => Some(BookingStatus::Failed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "expired" => Some(BookingStatus::Expired),
            _ => None,
        }
    }

    /// Whether a transition from `self` to `to` is allowed.
    ///
    /// Pending fans out to every terminal state; paid may still be
    /// cancelled through the admin refund path. Everything else is final.
    pub fn can_transition_to(&self, to: BookingStatus) -> bool {
        match self {
            BookingStatus::Pending => to != BookingStatus::Pending,
            BookingStatus::Paid => to == BookingStatus::Cancelled,
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traveler details captured by the checkout wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelerDetails {
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub passport_number: Option<String>,
}

/// Add-on selection captured by the checkout wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonSelection {
    pub addon_id: i64,
    pub quantity: i32,
}

/// Lead contact captured by the checkout wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Booking row plus its child records, as served by the lookup and admin detail endpoints
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub travelers: Vec<BookingTraveler>,
    pub addons: Vec<BookingAddon>,
}

/// Query parameters accepted by the admin booking listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub tour_id: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_reach_every_terminal_state() {
        for to in [
            BookingStatus::Paid,
            BookingStatus::Failed,
            BookingStatus::Cancelled,
            BookingStatus::Expired,
        ] {
            assert!(BookingStatus::Pending.can_transition_to(to), "pending -> {}", to);
        }
    }

    #[test]
    fn test_paid_only_cancellable() {
        assert!(BookingStatus::Paid.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Paid.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Paid.can_transition_to(BookingStatus::Failed));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in [BookingStatus::Failed, BookingStatus::Cancelled, BookingStatus::Expired] {
            for to in [BookingStatus::Pending, BookingStatus::Paid, BookingStatus::Cancelled] {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Paid,
            BookingStatus::Failed,
            BookingStatus::Cancelled,
            BookingStatus::Expired,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("refunded"), None);
    }
}
