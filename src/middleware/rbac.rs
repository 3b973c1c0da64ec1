//! Role and ownership checks for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::AppState;

/// Extractor that requires the Admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(RequireAdmin(user))
    }
}

/// Allow access to a user-owned resource only for its owner or an admin.
pub fn ensure_owner_or_admin(user: &CurrentUser, owner_id: Uuid) -> Result<(), AppError> {
    if user.id == owner_id || user.is_admin() {
        return Ok(());
    }
    tracing::warn!(user_id = %user.id, owner_id = %owner_id, "Cross-user access denied");
    Err(AppError::Forbidden(
        "You do not have access to this resource".to_string(),
    ))
}
