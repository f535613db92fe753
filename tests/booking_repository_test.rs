//! Seat reservation and release tests
//!
//! These exercise the booking transactions against a live Postgres named by
//! TEST_DATABASE_URL and skip when none is configured. Each test seeds its
//! own tour and departure so parallel runs do not interfere.

mod helpers;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Duration, Utc};
use helpers::database_pool_or_skip;
use sqlx::PgPool;
use tourbook::database::repositories::{BookingRepository, NewBooking};
use tourbook::models::booking::{BookingStatus, TravelerDetails};
use tourbook::utils::errors::TourbookError;
use uuid::Uuid;

async fn seed_departure(pool: &PgPool, total_spaces: i32) -> (i64, i64) {
    let slug = format!("trek-{}", Uuid::new_v4().simple());
    let (tour_id,): (i64,) = sqlx::query_as(
        "INSERT INTO tours (slug, title, base_price_cents, kitty_cents, duration_days, is_published) VALUES ($1, 'Test Trek', 100000, 2500, 10, TRUE) RETURNING id",
    )
    .bind(&slug)
    .fetch_one(pool)
    .await
    .unwrap();

    let (departure_id,): (i64,) = sqlx::query_as(
        "INSERT INTO tour_departures (tour_id, start_date, end_date, total_spaces, available_spaces) VALUES ($1, '2027-05-01', '2027-05-11', $2, $2) RETURNING id",
    )
    .bind(tour_id)
    .bind(total_spaces)
    .fetch_one(pool)
    .await
    .unwrap();

    (tour_id, departure_id)
}

async fn available_spaces(pool: &PgPool, departure_id: i64) -> i32 {
    let (spaces,): (i32,) =
        sqlx::query_as("SELECT available_spaces FROM tour_departures WHERE id = $1")
            .bind(departure_id)
            .fetch_one(pool)
            .await
            .unwrap();
    spaces
}

fn traveler(name: &str) -> TravelerDetails {
    TravelerDetails {
        full_name: name.to_string(),
        date_of_birth: None,
        passport_number: None,
    }
}

fn new_booking(
    tour_id: i64,
    departure_id: i64,
    travelers: Vec<TravelerDetails>,
    expires_at: DateTime<Utc>,
) -> NewBooking {
    let count = travelers.len() as i64;
    let per_person_cents = 100_000;
    let kitty_cents = 2_500;
    let addon_lines = vec![
        (1, "Airport transfer".to_string(), 5_000, 2),
        (2, "Gear hire".to_string(), 1_500, 1),
    ];
    let addons_cents: i64 = addon_lines
        .iter()
        .map(|(_, _, unit, qty)| unit * *qty as i64)
        .sum();
    let donation_cents = 700;

    NewBooking {
        reference: format!("TB-{}", &Uuid::new_v4().simple().to_string()[..8].to_uppercase()),
        tour_id,
        departure_id,
        user_id: None,
        contact_name: "Lead Traveler".to_string(),
        contact_email: "lead@example.com".to_string(),
        contact_phone: None,
        room_option_id: None,
        travelers,
        addon_lines,
        per_person_cents,
        room_supplement_cents: 0,
        kitty_cents,
        addons_cents,
        donation_cents,
        total_cents: (per_person_cents + kitty_cents) * count + addons_cents + donation_cents,
        currency: "USD".to_string(),
        expires_at,
    }
}

fn hold_window() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(30)
}

#[tokio::test]
async fn test_create_pending_reserves_seats_and_stores_itemized_total() {
    let Some(pool) = database_pool_or_skip().await else {
        return;
    };
    let repo = BookingRepository::new(pool.clone());
    let (tour_id, departure_id) = seed_departure(&pool, 5).await;

    let booking = repo
        .create_pending(new_booking(
            tour_id,
            departure_id,
            vec![traveler("A"), traveler("B")],
            hold_window(),
        ))
        .await
        .unwrap();

    assert_eq!(booking.status, "pending");
    assert_eq!(booking.travelers_count, 2);
    assert_eq!(available_spaces(&pool, departure_id).await, 3);

    let travelers = repo.list_travelers(booking.id).await.unwrap();
    assert_eq!(travelers.len(), 2);

    // The stored total must match what the persisted line items add up to.
    let addons = repo.list_addons(booking.id).await.unwrap();
    let addons_total: i64 = addons
        .iter()
        .map(|a| a.unit_price_cents * a.quantity as i64)
        .sum();
    let recomputed = (booking.per_person_cents + booking.room_supplement_cents + booking.kitty_cents)
        * booking.travelers_count as i64
        + addons_total
        + booking.donation_cents;
    assert_eq!(booking.addons_cents, addons_total);
    assert_eq!(booking.total_cents, recomputed);
}

#[tokio::test]
async fn test_oversell_rolls_back_and_maps_to_conflict() {
    let Some(pool) = database_pool_or_skip().await else {
        return;
    };
    let repo = BookingRepository::new(pool.clone());
    let (tour_id, departure_id) = seed_departure(&pool, 1).await;

    let new = new_booking(
        tour_id,
        departure_id,
        vec![traveler("A"), traveler("B")],
        hold_window(),
    );
    let reference = new.reference.clone();
    let err = repo.create_pending(new).await.unwrap_err();
    assert_matches!(&err, TourbookError::SoldOut { requested: 2, available: 1 });
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

    // Nothing was committed: seats untouched, no booking row.
    assert_eq!(available_spaces(&pool, departure_id).await, 1);
    assert!(repo.find_by_reference(&reference).await.unwrap().is_none());

    // Taking exactly the remaining seat still works.
    repo.create_pending(new_booking(tour_id, departure_id, vec![traveler("A")], hold_window()))
        .await
        .unwrap();
    assert_eq!(available_spaces(&pool, departure_id).await, 0);

    let err = repo
        .create_pending(new_booking(tour_id, departure_id, vec![traveler("C")], hold_window()))
        .await
        .unwrap_err();
    assert_matches!(err, TourbookError::SoldOut { requested: 1, available: 0 });
}

#[tokio::test]
async fn test_release_happens_exactly_once() {
    let Some(pool) = database_pool_or_skip().await else {
        return;
    };
    let repo = BookingRepository::new(pool.clone());
    let (tour_id, departure_id) = seed_departure(&pool, 4).await;

    let booking = repo
        .create_pending(new_booking(
            tour_id,
            departure_id,
            vec![traveler("A"), traveler("B"), traveler("C")],
            hold_window(),
        ))
        .await
        .unwrap();
    assert_eq!(available_spaces(&pool, departure_id).await, 1);

    let released = repo
        .release_to(booking.id, BookingStatus::Failed)
        .await
        .unwrap()
        .expect("pending booking releases");
    assert_eq!(released.status, "failed");
    assert_eq!(available_spaces(&pool, departure_id).await, 4);

    // A second release matches no row and must not re-increment.
    let again = repo.release_to(booking.id, BookingStatus::Expired).await.unwrap();
    assert!(again.is_none());
    assert_eq!(available_spaces(&pool, departure_id).await, 4);
}

#[tokio::test]
async fn test_capture_only_succeeds_from_pending() {
    let Some(pool) = database_pool_or_skip().await else {
        return;
    };
    let repo = BookingRepository::new(pool.clone());
    let (tour_id, departure_id) = seed_departure(&pool, 3).await;

    let booking = repo
        .create_pending(new_booking(
            tour_id,
            departure_id,
            vec![traveler("A"), traveler("B")],
            hold_window(),
        ))
        .await
        .unwrap();

    let paid = repo
        .mark_paid(booking.id, "CAP-001")
        .await
        .unwrap()
        .expect("pending booking captures");
    assert_eq!(paid.status, "paid");
    assert_eq!(paid.payment_capture_id.as_deref(), Some("CAP-001"));
    assert!(paid.expires_at.is_none());

    // Paid bookings keep their seats and ignore both a second capture
    // and a release attempt.
    assert_eq!(available_spaces(&pool, departure_id).await, 1);
    assert!(repo.mark_paid(booking.id, "CAP-002").await.unwrap().is_none());
    assert!(repo
        .release_to(booking.id, BookingStatus::Cancelled)
        .await
        .unwrap()
        .is_none());
    assert_eq!(available_spaces(&pool, departure_id).await, 1);
}

#[tokio::test]
async fn test_expired_hold_is_swept_and_cannot_be_captured() {
    let Some(pool) = database_pool_or_skip().await else {
        return;
    };
    let repo = BookingRepository::new(pool.clone());
    let (tour_id, departure_id) = seed_departure(&pool, 2).await;

    let booking = repo
        .create_pending(new_booking(
            tour_id,
            departure_id,
            vec![traveler("A")],
            Utc::now() - Duration::minutes(5),
        ))
        .await
        .unwrap();
    assert_eq!(available_spaces(&pool, departure_id).await, 1);

    let stale = repo.list_expired_pending(Utc::now(), 100).await.unwrap();
    assert!(stale.iter().any(|b| b.id == booking.id));

    let expired = repo
        .release_to(booking.id, BookingStatus::Expired)
        .await
        .unwrap()
        .expect("lapsed hold expires");
    assert_eq!(expired.status, "expired");
    assert_eq!(available_spaces(&pool, departure_id).await, 2);

    // A capture racing the sweep finds nothing pending to flip.
    assert!(repo.mark_paid(booking.id, "CAP-LATE").await.unwrap().is_none());
}
