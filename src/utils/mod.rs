//! Utility modules
//!
//! Common helpers, error types, and logging setup.

pub mod errors;
pub mod helpers;
pub mod logging;

pub use errors::{PaymentError, Result, TourbookError};
