//! Habit routes: CRUD, completion, category listing, and weekly summary.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::ensure_owner_or_admin;
use crate::models::habit::{CreateHabit, Habit, HabitCategory, HabitFilters, UpdateHabit};
use crate::services::habit::{self as habit_service, HabitCompletion, WeeklySummary};
use crate::AppState;

/// GET /api/v1/habits: the current user's habits, newest first.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filters): Query<HabitFilters>,
) -> Result<Json<ApiResponse<Vec<Habit>>>, AppError> {
    let habits = habit_service::list_for_user(&state.db, current_user.id, filters.category).await?;
    Ok(ApiResponse::success(habits))
}

/// GET /api/v1/habits/categories/:category
pub async fn list_by_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category): Path<HabitCategory>,
) -> Result<Json<ApiResponse<Vec<Habit>>>, AppError> {
    let habits = habit_service::list_for_user(&state.db, current_user.id, Some(category)).await?;
    Ok(ApiResponse::success(habits))
}

/// POST /api/v1/habits
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateHabit>,
) -> Result<(StatusCode, Json<ApiResponse<Habit>>), AppError> {
    let habit = habit_service::create(&state.db, current_user.id, &body).await?;
    Ok(ApiResponse::with_status(StatusCode::CREATED, habit))
}

/// GET /api/v1/habits/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Habit>>, AppError> {
    let habit = habit_service::find_by_id(&state.db, id).await?;
    ensure_owner_or_admin(&current_user, habit.user_id)?;
    Ok(ApiResponse::success(habit))
}

/// PUT /api/v1/habits/:id
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateHabit>,
) -> Result<Json<ApiResponse<Habit>>, AppError> {
    let existing = habit_service::find_by_id(&state.db, id).await?;
    ensure_owner_or_admin(&current_user, existing.user_id)?;
    let habit = habit_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(habit))
}

/// DELETE /api/v1/habits/:id
pub async fn delete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    let existing = habit_service::find_by_id(&state.db, id).await?;
    ensure_owner_or_admin(&current_user, existing.user_id)?;
    habit_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Habit deleted"))
}

/// POST /api/v1/habits/:id/complete
pub async fn complete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<HabitCompletion>>, AppError> {
    let existing = habit_service::find_by_id(&state.db, id).await?;
    ensure_owner_or_admin(&current_user, existing.user_id)?;
    let completion = habit_service::complete(&state.db, id).await?;
    Ok(ApiResponse::success(completion))
}

/// GET /api/v1/habits/summary/weekly
pub async fn weekly_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<WeeklySummary>>, AppError> {
    let summary =
        habit_service::weekly_summary(&state.db, current_user.id, &state.config.utc_offset)
            .await?;
    Ok(ApiResponse::success(summary))
}
