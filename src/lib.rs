//! Tourbook
//!
//! Backend for a tour operator's storefront and admin CMS: tour and
//! destination catalogue, a multi-step checkout wizard with server-side
//! pricing, seat-reserving bookings with an order-then-capture payment
//! handshake, OTP-gated booking self-service, and content management.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, TourbookError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::{api_router, AppState};
pub use services::ServiceFactory;
pub use state::{CheckoutWizard, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
