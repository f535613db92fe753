//! Admin CMS handlers
//!
//! Every route here sits behind the `AdminUser` extractor. Mutations go
//! through the repositories; destructive booking actions go through the
//! booking service so seat inventory stays consistent.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::json;

use crate::middleware::AdminUser;
use crate::models::booking::{Booking, BookingDetail, BookingFilter};
use crate::models::cms::{
    Article, Banner, CreateArticleRequest, CreateBannerRequest, UpdateArticleRequest,
    UpdateBannerRequest,
};
use crate::models::destination::{
    CreateDestinationRequest, Destination, UpdateDestinationRequest,
};
use crate::models::departure::{
    CreateDepartureRequest, CreateRoomOptionRequest, RoomOption, TourDeparture,
    UpdateDepartureRequest, UpdateRoomOptionRequest,
};
use crate::models::tour::{
    CreateAddonRequest, CreateTourRequest, Tour, TourAddon, UpdateAddonRequest, UpdateTourRequest,
};
use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserRole};
use crate::services::{AuthService, DashboardStats};
use crate::utils::errors::{Result, TourbookError};
use crate::utils::logging::log_admin_action;

use super::auth::UserView;
use super::cms::{BannerQuery, PageQuery};
use super::AppState;

// ---- Dashboard ----

pub async fn dashboard_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<DashboardStats>> {
    let stats = state.services.stats_service.dashboard().await?;
    Ok(Json(stats))
}

// ---- Bookings ----

pub async fn list_bookings(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<Booking>>> {
    let bookings = state.db.bookings.list(&filter).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<BookingDetail>> {
    let detail = state
        .db
        .booking_detail(id)
        .await?
        .ok_or_else(|| TourbookError::BookingNotFound {
            reference: id.to_string(),
        })?;
    Ok(Json(detail))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Booking>> {
    let booking = state.services.booking_service.cancel(id).await?;
    log_admin_action(admin.user_id, "booking.cancel", Some(&booking.reference));
    Ok(Json(booking))
}

// ---- Tours ----

pub async fn list_tours(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Tour>>> {
    let (limit, offset) = page.limit_offset();
    let tours = state.db.tours.list_all(limit, offset).await?;
    Ok(Json(tours))
}

pub async fn create_tour(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateTourRequest>,
) -> Result<Json<Tour>> {
    if request.base_price_cents < 0 {
        return Err(TourbookError::InvalidInput(
            "Base price cannot be negative".to_string(),
        ));
    }

    let tour = state.db.tours.create(request).await?;
    log_admin_action(admin.user_id, "tour.create", Some(&tour.slug));
    Ok(Json(tour))
}

pub async fn update_tour(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTourRequest>,
) -> Result<Json<Tour>> {
    let tour = state.db.tours.update(id, request).await?;
    log_admin_action(admin.user_id, "tour.update", Some(&tour.slug));
    Ok(Json(tour))
}

pub async fn delete_tour(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    state.db.tours.delete(id).await?;
    log_admin_action(admin.user_id, "tour.delete", Some(&id.to_string()));
    Ok(Json(json!({ "deleted": id })))
}

// ---- Add-ons ----

pub async fn list_addons(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(tour_id): Path<i64>,
) -> Result<Json<Vec<TourAddon>>> {
    let addons = state.db.tours.list_addons(tour_id, false).await?;
    Ok(Json(addons))
}

pub async fn create_addon(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateAddonRequest>,
) -> Result<Json<TourAddon>> {
    let addon = state.db.tours.create_addon(request).await?;
    log_admin_action(admin.user_id, "addon.create", Some(&addon.name));
    Ok(Json(addon))
}

pub async fn update_addon(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAddonRequest>,
) -> Result<Json<TourAddon>> {
    let addon = state.db.tours.update_addon(id, request).await?;
    log_admin_action(admin.user_id, "addon.update", Some(&addon.name));
    Ok(Json(addon))
}

pub async fn delete_addon(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    state.db.tours.delete_addon(id).await?;
    log_admin_action(admin.user_id, "addon.delete", Some(&id.to_string()));
    Ok(Json(json!({ "deleted": id })))
}

// ---- Departures ----

pub async fn list_departures(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(tour_id): Path<i64>,
) -> Result<Json<Vec<TourDeparture>>> {
    let departures = state.db.departures.list_for_tour(tour_id).await?;
    Ok(Json(departures))
}

pub async fn create_departure(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateDepartureRequest>,
) -> Result<Json<TourDeparture>> {
    let departure = state.db.departures.create(request).await?;
    log_admin_action(admin.user_id, "departure.create", Some(&departure.id.to_string()));
    Ok(Json(departure))
}

pub async fn update_departure(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDepartureRequest>,
) -> Result<Json<TourDeparture>> {
    let departure = state.db.departures.update(id, request).await?;
    log_admin_action(admin.user_id, "departure.update", Some(&id.to_string()));
    Ok(Json(departure))
}

pub async fn delete_departure(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    state.db.departures.delete(id).await?;
    log_admin_action(admin.user_id, "departure.delete", Some(&id.to_string()));
    Ok(Json(json!({ "deleted": id })))
}

// ---- Room options ----

pub async fn list_room_options(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(tour_id): Path<i64>,
) -> Result<Json<Vec<RoomOption>>> {
    let rooms = state.db.departures.list_room_options(tour_id, false).await?;
    Ok(Json(rooms))
}

pub async fn create_room_option(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateRoomOptionRequest>,
) -> Result<Json<RoomOption>> {
    let room = state.db.departures.create_room_option(request).await?;
    log_admin_action(admin.user_id, "room.create", Some(&room.name));
    Ok(Json(room))
}

pub async fn update_room_option(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRoomOptionRequest>,
) -> Result<Json<RoomOption>> {
    let room = state.db.departures.update_room_option(id, request).await?;
    log_admin_action(admin.user_id, "room.update", Some(&room.name));
    Ok(Json(room))
}

pub async fn delete_room_option(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    state.db.departures.delete_room_option(id).await?;
    log_admin_action(admin.user_id, "room.delete", Some(&id.to_string()));
    Ok(Json(json!({ "deleted": id })))
}

// ---- Destinations ----

pub async fn list_destinations(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Destination>>> {
    let destinations = state.db.destinations.list(false).await?;
    Ok(Json(destinations))
}

pub async fn create_destination(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateDestinationRequest>,
) -> Result<Json<Destination>> {
    let destination = state.db.destinations.create(request).await?;
    log_admin_action(admin.user_id, "destination.create", Some(&destination.slug));
    Ok(Json(destination))
}

pub async fn update_destination(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDestinationRequest>,
) -> Result<Json<Destination>> {
    let destination = state.db.destinations.update(id, request).await?;
    log_admin_action(admin.user_id, "destination.update", Some(&destination.slug));
    Ok(Json(destination))
}

pub async fn delete_destination(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    state.db.destinations.delete(id).await?;
    log_admin_action(admin.user_id, "destination.delete", Some(&id.to_string()));
    Ok(Json(json!({ "deleted": id })))
}

// ---- Users ----

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<UserView>>> {
    let (limit, offset) = page.limit_offset();
    let users = state.db.users.list(limit, offset).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserView>> {
    if request.password.len() < 8 {
        return Err(TourbookError::InvalidInput(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let salt = AuthService::generate_salt();
    let hash = AuthService::hash_password(&request.password, &salt);
    let role = request.role.unwrap_or(UserRole::Customer);

    let user = state
        .db
        .users
        .create(
            request.email.trim(),
            &hash,
            &salt,
            &request.full_name,
            role.as_str(),
        )
        .await?;

    log_admin_action(admin.user_id, "user.create", Some(&user.email));
    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserView>> {
    let user = state
        .db
        .users
        .update(
            id,
            request.email.as_deref(),
            request.full_name.as_deref(),
            request.role.map(|r| r.as_str()),
            request.is_active,
        )
        .await?;

    log_admin_action(admin.user_id, "user.update", Some(&user.email));
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    if id == admin.user_id {
        return Err(TourbookError::InvalidInput(
            "Cannot delete your own account".to_string(),
        ));
    }

    state.db.users.delete(id).await?;
    log_admin_action(admin.user_id, "user.delete", Some(&id.to_string()));
    Ok(Json(json!({ "deleted": id })))
}

// ---- Articles ----

pub async fn list_articles(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Article>>> {
    let (limit, offset) = page.limit_offset();
    let articles = state.db.cms.list_articles(false, limit, offset).await?;
    Ok(Json(articles))
}

pub async fn create_article(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(mut request): Json<CreateArticleRequest>,
) -> Result<Json<Article>> {
    request.author_id = request.author_id.or(Some(admin.user_id));
    let article = state.db.cms.create_article(request).await?;
    log_admin_action(admin.user_id, "article.create", Some(&article.slug));
    Ok(Json(article))
}

pub async fn update_article(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateArticleRequest>,
) -> Result<Json<Article>> {
    let article = state.db.cms.update_article(id, request).await?;
    log_admin_action(admin.user_id, "article.update", Some(&article.slug));
    Ok(Json(article))
}

pub async fn delete_article(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    state.db.cms.delete_article(id).await?;
    log_admin_action(admin.user_id, "article.delete", Some(&id.to_string()));
    Ok(Json(json!({ "deleted": id })))
}

// ---- Banners ----

pub async fn list_banners(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<BannerQuery>,
) -> Result<Json<Vec<Banner>>> {
    let banners = state
        .db
        .cms
        .list_banners(query.position.as_deref(), false)
        .await?;
    Ok(Json(banners))
}

pub async fn create_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateBannerRequest>,
) -> Result<Json<Banner>> {
    let banner = state.db.cms.create_banner(request).await?;
    log_admin_action(admin.user_id, "banner.create", Some(&banner.title));
    Ok(Json(banner))
}

pub async fn update_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBannerRequest>,
) -> Result<Json<Banner>> {
    let banner = state.db.cms.update_banner(id, request).await?;
    log_admin_action(admin.user_id, "banner.update", Some(&banner.title));
    Ok(Json(banner))
}

pub async fn delete_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    state.db.cms.delete_banner(id).await?;
    log_admin_action(admin.user_id, "banner.delete", Some(&id.to_string()));
    Ok(Json(json!({ "deleted": id })))
}
