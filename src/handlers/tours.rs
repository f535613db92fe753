//! Storefront tour handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::models::departure::{RoomOption, TourDeparture};
use crate::models::tour::{Tour, TourAddon, TourFilter};
use crate::utils::errors::{Result, TourbookError};

use super::AppState;

/// Tour detail with everything the product page needs
#[derive(Debug, Serialize)]
pub struct TourDetail {
    #[serde(flatten)]
    pub tour: Tour,
    pub addons: Vec<TourAddon>,
    pub room_options: Vec<RoomOption>,
    pub departures: Vec<TourDeparture>,
}

/// List published tours with optional destination and search filters
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TourFilter>,
) -> Result<Json<Vec<Tour>>> {
    let tours = state.db.tours.list_published(&filter).await?;
    Ok(Json(tours))
}

/// Tour product page: the tour plus its active add-ons, room options,
/// and upcoming open departures
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TourDetail>> {
    let tour = state
        .db
        .tours
        .find_by_slug(&slug)
        .await?
        .filter(|t| t.is_published)
        .ok_or_else(|| TourbookError::TourNotFound(slug))?;

    let addons = state.db.tours.list_addons(tour.id, true).await?;
    let room_options = state.db.departures.list_room_options(tour.id, true).await?;
    let departures = state.db.departures.list_upcoming(tour.id).await?;

    Ok(Json(TourDetail {
        tour,
        addons,
        room_options,
        departures,
    }))
}
