//! Dashboard statistics service

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Aggregates served to the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub bookings_by_status: HashMap<String, i64>,
    pub paid_revenue_cents: i64,
    pub total_tours: i64,
    pub total_users: i64,
    pub upcoming_departures: i64,
    pub top_tours: Vec<TourSales>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourSales {
    pub tour_id: i64,
    pub paid_bookings: i64,
    pub revenue_cents: i64,
}

/// Dashboard aggregation over the repositories
#[derive(Debug, Clone)]
pub struct StatsService {
    db: DatabaseService,
}

impl StatsService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let bookings_by_status = self
            .db
            .bookings
            .count_by_status()
            .await?
            .into_iter()
            .collect();
        let paid_revenue_cents = self.db.bookings.paid_revenue_cents().await?;
        let total_tours = self.db.tours.count().await?;
        let total_users = self.db.users.count().await?;
        let upcoming_departures = self.db.departures.count_upcoming().await?;
        let top_tours = self
            .db
            .bookings
            .top_tours(5)
            .await?
            .into_iter()
            .map(|(tour_id, paid_bookings, revenue_cents)| TourSales {
                tour_id,
                paid_bookings,
                revenue_cents,
            })
            .collect();

        Ok(DashboardStats {
            bookings_by_status,
            paid_revenue_cents,
            total_tours,
            total_users,
            upcoming_departures,
            top_tours,
        })
    }
}
