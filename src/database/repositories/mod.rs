//! Database repositories module
//!
//! One repository per aggregate, all backed by the shared PgPool.

pub mod booking;
pub mod cms;
pub mod departure;
pub mod destination;
pub mod tour;
pub mod user;

pub use booking::{BookingRepository, NewBooking};
pub use cms::CmsRepository;
pub use departure::DepartureRepository;
pub use destination::DestinationRepository;
pub use tour::TourRepository;
pub use user::UserRepository;
