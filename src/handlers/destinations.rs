//! Storefront destination handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::models::destination::{Destination, DestinationNode};
use crate::models::tour::{Tour, TourFilter};
use crate::utils::errors::{Result, TourbookError};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct DestinationDetail {
    #[serde(flatten)]
    pub destination: Destination,
    pub tours: Vec<Tour>,
}

/// Published destinations as a parent/child tree
pub async fn list_tree(State(state): State<AppState>) -> Result<Json<Vec<DestinationNode>>> {
    let destinations = state.db.destinations.list(true).await?;
    Ok(Json(DestinationNode::build_tree(destinations)))
}

/// A destination landing page with its published tours
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<DestinationDetail>> {
    let destination = state
        .db
        .destinations
        .find_by_slug(&slug)
        .await?
        .filter(|d| d.is_published)
        .ok_or_else(|| TourbookError::NotFound(format!("destination {}", slug)))?;

    let filter = TourFilter {
        destination_id: Some(destination.id),
        ..TourFilter::default()
    };
    let tours = state.db.tours.list_published(&filter).await?;

    Ok(Json(DestinationDetail { destination, tours }))
}
