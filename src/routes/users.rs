//! User routes: registration, login, profile, preferences, stats, and badges.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::{ensure_owner_or_admin, RequireAdmin};
use crate::models::user::{
    LoginUser, RegisterUser, UpdatePreferences, UpdateProfile, UserBadges, UserResponse,
    UserStats,
};
use crate::services::auth::{self as auth_service, LoginResponse};
use crate::services::user as user_service;
use crate::AppState;

/// POST /api/v1/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let user = auth_service::register(&state.db, &body).await?;
    Ok(ApiResponse::with_status(
        StatusCode::CREATED,
        UserResponse::from(user),
    ))
}

/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginUser>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = auth_service::login(
        &state.db,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(response))
}

/// GET /api/v1/users: admin-only listing.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = user_service::list(&state.db).await?;
    Ok(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// GET /api/v1/users/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    ensure_owner_or_admin(&current_user, id)?;
    let user = user_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// PUT /api/v1/users/:id: update name and email.
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProfile>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    ensure_owner_or_admin(&current_user, id)?;
    let user = user_service::update_profile(&state.db, id, &body).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// GET /api/v1/users/:id/stats
pub async fn stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserStats>>, AppError> {
    ensure_owner_or_admin(&current_user, id)?;
    let user = user_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(UserStats::from(&user)))
}

/// GET /api/v1/users/:id/badges
pub async fn badges(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserBadges>>, AppError> {
    ensure_owner_or_admin(&current_user, id)?;
    let user = user_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(UserBadges {
        badges: user.badges,
    }))
}

/// POST /api/v1/users/:id/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePreferences>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    ensure_owner_or_admin(&current_user, id)?;
    let user = user_service::update_preferences(&state.db, id, &body.goal_preferences).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
