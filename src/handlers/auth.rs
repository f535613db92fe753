//! Authentication handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::middleware::AuthUser;
use crate::models::user::User;
use crate::utils::errors::{Result, TourbookError};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// User representation safe to return to clients
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
        }
    }
}

/// Exchange credentials for a bearer token.
///
/// The same generic error covers an unknown email, a wrong password, and
/// a deactivated account.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let invalid =
        || TourbookError::Authentication("Invalid email or password".to_string());

    let user = state
        .db
        .users
        .find_by_email(request.email.trim())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(invalid)?;

    if !state
        .services
        .auth_service
        .verify_password(&user, &request.password)
    {
        warn!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    let token = state.services.auth_service.issue_token(&user)?;
    info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// The authenticated user's own profile
pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserView>> {
    let user = state
        .db
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| TourbookError::NotFound(format!("user {}", user.user_id)))?;

    Ok(Json(user.into()))
}
