//! User profile, preferences, and stats queries.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::user::{GoalPreferences, UpdateProfile, User};

/// List all users, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Find a user by ID, if present.
pub async fn find_optional(pool: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Find a user by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    find_optional(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Partially update name and email.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateProfile,
) -> Result<User, AppError> {
    input.validate()?;

    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            first_name = COALESCE($2, first_name),
            last_name  = COALESCE($3, last_name),
            email      = COALESCE($4, email)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(input.email.as_deref().map(str::to_lowercase))
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Email already in use"))?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Replace the user's goal preferences.
pub async fn update_preferences(
    pool: &PgPool,
    id: Uuid,
    prefs: &GoalPreferences,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET diet = $2, transport = $3, energy_use = $4, waste_management = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(prefs.diet)
    .bind(prefs.transport)
    .bind(prefs.energy_use)
    .bind(prefs.waste_management)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
