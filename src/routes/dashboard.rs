//! Dashboard route: per-user aggregated statistics.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::ensure_owner_or_admin;
use crate::services::dashboard::{self, DashboardView};
use crate::AppState;

/// GET /api/v1/users/:id/dashboard
pub async fn get(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    ensure_owner_or_admin(&current_user, id)?;
    let view = dashboard::get_dashboard(&state.db, id, &state.config.utc_offset).await?;
    Ok(ApiResponse::success(view))
}
