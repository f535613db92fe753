//! HTTP handlers module
//!
//! Route handlers for the storefront API, the checkout wizard, the
//! OTP-gated booking lookup, payment callbacks, and the admin CMS.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod checkout;
pub mod cms;
pub mod destinations;
pub mod exchange;
pub mod payment;
pub mod tours;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::middleware::RateLimiter;
use crate::services::ServiceFactory;
use crate::state::{CheckoutWizard, SessionStore};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub db: DatabaseService,
    pub services: Arc<ServiceFactory>,
    pub sessions: SessionStore,
    pub wizard: CheckoutWizard,
    pub otp_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        settings: Settings,
        db: DatabaseService,
        services: Arc<ServiceFactory>,
        sessions: SessionStore,
    ) -> Self {
        let wizard = CheckoutWizard::new(
            settings.booking.max_travelers,
            settings.booking.session_ttl_seconds,
        );
        // Five OTP requests per reference per five minutes is plenty for
        // humans and starves enumeration attempts.
        let otp_limiter = RateLimiter::new(services.redis_service.clone(), 5, 300);

        Self {
            settings,
            db,
            services,
            sessions,
            wizard,
            otp_limiter,
        }
    }
}

/// Build the full API router
pub fn api_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/destinations", get(destinations::list_tree))
        .route("/destinations/:slug", get(destinations::get_by_slug))
        .route("/tours", get(tours::list))
        .route("/tours/:slug", get(tours::get_by_slug))
        .route("/rates/:currency", get(exchange::get_rate))
        .route("/articles", get(cms::list_articles))
        .route("/articles/:slug", get(cms::get_article))
        .route("/banners", get(cms::list_banners))
        .route("/checkout", post(checkout::start))
        .route("/checkout/:id", get(checkout::get_session))
        .route("/checkout/:id/travelers", put(checkout::set_travelers))
        .route("/checkout/:id/extras", put(checkout::set_extras))
        .route("/checkout/:id/review", post(checkout::confirm_review))
        .route("/checkout/:id/payment", post(payment::begin))
        .route("/payments/capture", post(payment::capture))
        .route("/bookings/lookup", post(bookings::request_otp))
        .route("/bookings/verify", post(bookings::verify_otp))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/cancel", post(bookings::cancel_booking));

    let authenticated = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me));

    let admin = Router::new()
        .route("/stats", get(admin::dashboard_stats))
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/:id", get(admin::get_booking))
        .route("/bookings/:id/cancel", post(admin::cancel_booking))
        .route("/tours", get(admin::list_tours).post(admin::create_tour))
        .route(
            "/tours/:id",
            put(admin::update_tour).delete(admin::delete_tour),
        )
        .route("/tours/:id/addons", get(admin::list_addons))
        .route("/tours/:id/departures", get(admin::list_departures))
        .route("/tours/:id/rooms", get(admin::list_room_options))
        .route("/addons", post(admin::create_addon))
        .route(
            "/addons/:id",
            put(admin::update_addon).delete(admin::delete_addon),
        )
        .route("/departures", post(admin::create_departure))
        .route(
            "/departures/:id",
            put(admin::update_departure).delete(admin::delete_departure),
        )
        .route("/rooms", post(admin::create_room_option))
        .route(
            "/rooms/:id",
            put(admin::update_room_option).delete(admin::delete_room_option),
        )
        .route(
            "/destinations",
            get(admin::list_destinations).post(admin::create_destination),
        )
        .route(
            "/destinations/:id",
            put(admin::update_destination).delete(admin::delete_destination),
        )
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/:id",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/articles", get(admin::list_articles).post(admin::create_article))
        .route(
            "/articles/:id",
            put(admin::update_article).delete(admin::delete_article),
        )
        .route("/banners", get(admin::list_banners).post(admin::create_banner))
        .route(
            "/banners/:id",
            put(admin::update_banner).delete(admin::delete_banner),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", public.merge(authenticated))
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness and dependency health
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let database = state.db.health_check().await.is_ok();
    let redis = state.services.health_check().await;

    Json(json!({
        "status": if database && redis { "ok" } else { "degraded" },
        "database": database,
        "redis": redis,
    }))
}
