//! Tour and add-on models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tour {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub destination_id: Option<i64>,
    /// Per-person price in minor units, used when a departure has no price of its own
    pub base_price_cents: i64,
    /// Mandatory shared-expense kitty collected per traveler
    pub kitty_cents: i64,
    pub duration_days: i32,
    pub hero_image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional extra purchasable with a tour (airport transfer, gear hire, ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TourAddon {
    pub id: i64,
    pub tour_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub unit_price_cents: i64,
    pub max_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTourRequest {
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub destination_id: Option<i64>,
    pub base_price_cents: i64,
    pub kitty_cents: Option<i64>,
    pub duration_days: i32,
    pub hero_image_url: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTourRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub destination_id: Option<i64>,
    pub base_price_cents: Option<i64>,
    pub kitty_cents: Option<i64>,
    pub duration_days: Option<i32>,
    pub hero_image_url: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAddonRequest {
    pub tour_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub unit_price_cents: i64,
    pub max_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAddonRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price_cents: Option<i64>,
    pub max_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

/// Query parameters accepted by the public tour listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TourFilter {
    pub destination_id: Option<i64>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
