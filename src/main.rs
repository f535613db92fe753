//! Tourbook server
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use tourbook::{
    config::Settings,
    database::{connection::create_pool, run_migrations, DatabaseService},
    handlers::{api_router, AppState},
    services::ServiceFactory,
    state::SessionStore,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting Tourbook server...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = tourbook::database::DatabaseConfig::from(&settings.database);
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);

    // Initialize services
    info!("Initializing services...");
    let services = Arc::new(ServiceFactory::new(
        settings.clone(),
        database_service.clone(),
    )?);

    // Checkout sessions live in Redis with their own TTL
    let sessions = SessionStore::new(
        settings.redis.clone(),
        settings.booking.session_ttl_seconds,
    )
    .await?;

    let state = AppState::new(
        settings.clone(),
        database_service,
        services.clone(),
        sessions,
    );

    // Periodic sweep releasing seats held by lapsed pending bookings
    let sweep_services = services.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            if let Err(e) = sweep_services.booking_service.expire_stale_holds().await {
                error!(error = %e, "Hold expiry sweep failed");
            }
        }
    });

    let app = api_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!(addr = %addr, "Listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
