//! Departure and room-option repository implementation
//!
//! Seat reservation and release live in the booking repository, where they
//! run inside the booking transaction. This repository covers admin CRUD
//! and storefront reads.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::departure::{
    CreateDepartureRequest, CreateRoomOptionRequest, DepartureStatus, RoomOption, TourDeparture,
    UpdateDepartureRequest, UpdateRoomOptionRequest,
};
use crate::utils::errors::TourbookError;

const DEPARTURE_COLUMNS: &str = "id, tour_id, start_date, end_date, price_cents, total_spaces, available_spaces, status, created_at, updated_at";
const ROOM_COLUMNS: &str = "id, tour_id, name, description, supplement_cents, is_active, created_at";

#[derive(Debug, Clone)]
pub struct DepartureRepository {
    pool: PgPool,
}

impl DepartureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new departure with full availability
    pub async fn create(&self, request: CreateDepartureRequest) -> Result<TourDeparture, TourbookError> {
        if request.end_date < request.start_date {
            return Err(TourbookError::InvalidInput(
                "Departure end date precedes start date".to_string(),
            ));
        }
        if request.total_spaces <= 0 {
            return Err(TourbookError::InvalidInput(
                "Departure capacity must be positive".to_string(),
            ));
        }

        let departure = sqlx::query_as::<_, TourDeparture>(&format!(
            r#"
            INSERT INTO tour_departures (tour_id, start_date, end_date, price_cents, total_spaces, available_spaces, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5, $6, $7, $7)
            RETURNING {DEPARTURE_COLUMNS}
            "#
        ))
        .bind(request.tour_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.price_cents)
        .bind(request.total_spaces)
        .bind(request.status.unwrap_or(DepartureStatus::Open).as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(departure)
    }

    /// Find departure by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TourDeparture>, TourbookError> {
        let departure = sqlx::query_as::<_, TourDeparture>(&format!(
            "SELECT {DEPARTURE_COLUMNS} FROM tour_departures WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(departure)
    }

    /// List upcoming open departures for a tour
    pub async fn list_upcoming(&self, tour_id: i64) -> Result<Vec<TourDeparture>, TourbookError> {
        let departures = sqlx::query_as::<_, TourDeparture>(&format!(
            "SELECT {DEPARTURE_COLUMNS} FROM tour_departures WHERE tour_id = $1 AND status = 'open' AND start_date >= CURRENT_DATE ORDER BY start_date ASC"
        ))
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(departures)
    }

    /// List every departure for a tour (admin view)
    pub async fn list_for_tour(&self, tour_id: i64) -> Result<Vec<TourDeparture>, TourbookError> {
        let departures = sqlx::query_as::<_, TourDeparture>(&format!(
            "SELECT {DEPARTURE_COLUMNS} FROM tour_departures WHERE tour_id = $1 ORDER BY start_date ASC"
        ))
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(departures)
    }

    /// Update departure
    ///
    /// Capacity changes adjust `available_spaces` by the same delta so
    /// already-reserved seats stay reserved; availability is clamped at zero.
    pub async fn update(&self, id: i64, request: UpdateDepartureRequest) -> Result<TourDeparture, TourbookError> {
        let departure = sqlx::query_as::<_, TourDeparture>(&format!(
            r#"
            UPDATE tour_departures
            SET start_date = COALESCE($2, start_date),
                end_date = COALESCE($3, end_date),
                price_cents = COALESCE($4, price_cents),
                available_spaces = GREATEST(0, available_spaces + (COALESCE($5, total_spaces) - total_spaces)),
                total_spaces = COALESCE($5, total_spaces),
                status = COALESCE($6, status),
                updated_at = $7
            WHERE id = $1
            RETURNING {DEPARTURE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.price_cents)
        .bind(request.total_spaces)
        .bind(request.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(departure)
    }

    /// Delete departure
    pub async fn delete(&self, id: i64) -> Result<(), TourbookError> {
        sqlx::query("DELETE FROM tour_departures WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count upcoming open departures
    pub async fn count_upcoming(&self) -> Result<i64, TourbookError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tour_departures WHERE status = 'open' AND start_date >= CURRENT_DATE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Create a room option
    pub async fn create_room_option(&self, request: CreateRoomOptionRequest) -> Result<RoomOption, TourbookError> {
        let room = sqlx::query_as::<_, RoomOption>(&format!(
            r#"
            INSERT INTO room_options (tour_id, name, description, supplement_cents, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(request.tour_id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.supplement_cents)
        .bind(request.is_active.unwrap_or(true))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    /// Find room option by ID
    pub async fn find_room_option(&self, id: i64) -> Result<Option<RoomOption>, TourbookError> {
        let room = sqlx::query_as::<_, RoomOption>(&format!(
            "SELECT {ROOM_COLUMNS} FROM room_options WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// List room options for a tour
    pub async fn list_room_options(&self, tour_id: i64, active_only: bool) -> Result<Vec<RoomOption>, TourbookError> {
        let rooms = sqlx::query_as::<_, RoomOption>(&format!(
            "SELECT {ROOM_COLUMNS} FROM room_options WHERE tour_id = $1 AND (is_active OR NOT $2) ORDER BY supplement_cents ASC"
        ))
        .bind(tour_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Update room option
    pub async fn update_room_option(&self, id: i64, request: UpdateRoomOptionRequest) -> Result<RoomOption, TourbookError> {
        let room = sqlx::query_as::<_, RoomOption>(&format!(
            r#"
            UPDATE room_options
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                supplement_cents = COALESCE($4, supplement_cents),
                is_active = COALESCE($5, is_active)
            WHERE id = $1
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.supplement_cents)
        .bind(request.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    /// Delete room option
    pub async fn delete_room_option(&self, id: i64) -> Result<(), TourbookError> {
        sqlx::query("DELETE FROM room_options WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
