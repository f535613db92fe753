//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod booking;
pub mod cms;
pub mod departure;
pub mod destination;
pub mod tour;
pub mod user;

// Re-export commonly used models
pub use booking::{
    AddonSelection, Booking, BookingAddon, BookingDetail, BookingFilter, BookingStatus,
    BookingTraveler, ContactDetails, TravelerDetails,
};
pub use cms::{
    Article, Banner, CreateArticleRequest, CreateBannerRequest, UpdateArticleRequest,
    UpdateBannerRequest,
};
pub use departure::{
    CreateDepartureRequest, CreateRoomOptionRequest, DepartureStatus, RoomOption, TourDeparture,
    UpdateDepartureRequest, UpdateRoomOptionRequest,
};
pub use destination::{
    CreateDestinationRequest, Destination, DestinationNode, UpdateDestinationRequest,
};
pub use tour::{
    CreateAddonRequest, CreateTourRequest, Tour, TourAddon, TourFilter, UpdateAddonRequest,
    UpdateTourRequest,
};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserRole};
