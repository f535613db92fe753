//! Departure and room-option models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled instance of a tour with its own dates, price, and capacity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TourDeparture {
    pub id: i64,
    pub tour_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Per-person price override; falls back to the tour base price when absent
    pub price_cents: Option<i64>,
    pub total_spaces: i32,
    pub available_spaces: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A per-traveler accommodation choice with an optional price supplement
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomOption {
    pub id: i64,
    pub tour_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Flat per-traveler supplement in minor units; zero for the default room
    pub supplement_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureStatus {
    Open,
    Closed,
    Cancelled,
}

impl DepartureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepartureStatus::Open => "open",
            DepartureStatus::Closed => "closed",
            DepartureStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(DepartureStatus::Open),
            "closed" => Some(DepartureStatus::Closed),
            "cancelled" => Some(DepartureStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartureRequest {
    pub tour_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price_cents: Option<i64>,
    pub total_spaces: i32,
    pub status: Option<DepartureStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDepartureRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub price_cents: Option<i64>,
    pub total_spaces: Option<i32>,
    pub status: Option<DepartureStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomOptionRequest {
    pub tour_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub supplement_cents: i64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoomOptionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub supplement_cents: Option<i64>,
    pub is_active: Option<bool>,
}

impl TourDeparture {
    /// Effective per-person price, honoring the tour base fallback
    pub fn effective_price_cents(&self, tour_base_cents: i64) -> i64 {
        self.price_cents.unwrap_or(tour_base_cents)
    }

    pub fn is_open(&self) -> bool {
        self.status == DepartureStatus::Open.as_str()
    }
}
