//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    BookingRepository, CmsRepository, DatabasePool, DepartureRepository, DestinationRepository,
    TourRepository, UserRepository,
};
use crate::models::BookingDetail;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub destinations: DestinationRepository,
    pub tours: TourRepository,
    pub departures: DepartureRepository,
    pub bookings: BookingRepository,
    pub cms: CmsRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            destinations: DestinationRepository::new(pool.clone()),
            tours: TourRepository::new(pool.clone()),
            departures: DepartureRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            cms: CmsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Verify database connectivity
    pub async fn health_check(&self) -> crate::utils::errors::Result<()> {
        crate::database::connection::health_check(&self.pool).await
    }

    /// Load a booking together with its travelers and add-on lines
    pub async fn booking_detail(&self, booking_id: i64) -> crate::utils::errors::Result<Option<BookingDetail>> {
        let Some(booking) = self.bookings.find_by_id(booking_id).await? else {
            return Ok(None);
        };
        let travelers = self.bookings.list_travelers(booking.id).await?;
        let addons = self.bookings.list_addons(booking.id).await?;
        Ok(Some(BookingDetail {
            booking,
            travelers,
            addons,
        }))
    }
}
