//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging helpers
//! for the Tourbook application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "tourbook.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    // Keep the appender guard alive for the lifetime of the process.
    std::mem::forget(guard);

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log booking lifecycle transitions with structured data
pub fn log_booking_transition(booking_id: i64, from: &str, to: &str, details: Option<&str>) {
    info!(
        booking_id = booking_id,
        from = from,
        to = to,
        details = details,
        "Booking status transition"
    );
}

/// Log payment processor interactions
pub fn log_payment_event(booking_id: i64, order_id: &str, event: &str, success: bool) {
    if success {
        info!(
            booking_id = booking_id,
            order_id = order_id,
            event = event,
            "Payment event"
        );
    } else {
        warn!(
            booking_id = booking_id,
            order_id = order_id,
            event = event,
            "Payment event failed"
        );
    }
}

/// Log admin actions against CMS content or bookings
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        "Admin action performed"
    );
}
