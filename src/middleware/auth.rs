//! Authentication extractors
//!
//! Bearer-token extractors for protected routes. `AuthUser` accepts any
//! valid login token; `AdminUser` additionally requires the admin role.
//! Manage tokens for the OTP booking flow are checked in the handler
//! because the booking id they are scoped to comes from the path.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::{debug, warn};

use crate::handlers::AppState;
use crate::utils::errors::TourbookError;

pub const ROLE_ADMIN: &str = "admin";

/// An authenticated user, any role
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: String,
}

/// An authenticated user with the admin role
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: i64,
}

fn bearer_token(parts: &Parts) -> Result<&str, TourbookError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            TourbookError::Authentication("Missing authorization header".to_string())
        })?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        TourbookError::Authentication("Authorization header is not a bearer token".to_string())
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = TourbookError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = state.services.auth_service.verify_token(token)?;

        debug!(user_id = claims.sub, role = %claims.role, "Request authenticated");
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = TourbookError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != ROLE_ADMIN {
            warn!(user_id = user.user_id, role = %user.role, "Unauthorized admin access attempt");
            return Err(TourbookError::PermissionDenied(
                "Admin privileges required".to_string(),
            ));
        }

        Ok(AdminUser {
            user_id: user.user_id,
        })
    }
}

/// Bearer token passed through for handler-side checks (manage tokens)
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = TourbookError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(parts)?.to_string()))
    }
}
