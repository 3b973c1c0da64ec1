//! Habit service: CRUD, completion with rewards, and the weekly summary.

use chrono::{Duration, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::habit::{CreateHabit, Habit, HabitCategory, UpdateHabit};
use crate::services::rewards;

/// Days covered by the weekly summary, including today.
pub const WEEK_DAYS: i64 = 7;

/// Result of completing a habit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCompletion {
    pub message: String,
    pub habit: Habit,
    pub points_earned: i32,
    pub new_badges: Vec<String>,
}

/// Completions over the last [`WEEK_DAYS`] calendar days.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DaySummary>,
    pub total_completed: i64,
    pub carbon_saved: Decimal,
    pub by_category: Vec<CategoryCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub completed: i64,
    pub carbon_saved: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: HabitCategory,
    pub completed: i64,
}

/// Create a habit owned by `user_id`.
pub async fn create(pool: &PgPool, user_id: Uuid, input: &CreateHabit) -> Result<Habit, AppError> {
    input.validate()?;

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        INSERT INTO habits (user_id, description, category, carbon_footprint,
            sustainable_alternative, date)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&input.description)
    .bind(input.category)
    .bind(input.carbon_footprint)
    .bind(&input.sustainable_alternative)
    .bind(input.date)
    .fetch_one(pool)
    .await?;

    tracing::info!(habit_id = %habit.id, user_id = %user_id, category = ?habit.category, "Habit created");
    Ok(habit)
}

/// List a user's habits, newest record date first, optionally restricted to one category.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    category: Option<HabitCategory>,
) -> Result<Vec<Habit>, AppError> {
    let habits = sqlx::query_as::<_, Habit>(
        r#"
        SELECT * FROM habits
        WHERE user_id = $1 AND ($2::habit_category IS NULL OR category = $2)
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(habits)
}

/// Find a habit by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Habit, AppError> {
    sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".to_string()))
}

/// Edit description, category, footprint, or alternative.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateHabit) -> Result<Habit, AppError> {
    input.validate()?;

    sqlx::query_as::<_, Habit>(
        r#"
        UPDATE habits SET
            description             = COALESCE($2, description),
            category                = COALESCE($3, category),
            carbon_footprint        = COALESCE($4, carbon_footprint),
            sustainable_alternative = COALESCE($5, sustainable_alternative),
            updated_at              = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.description)
    .bind(input.category)
    .bind(input.carbon_footprint)
    .bind(&input.sustainable_alternative)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Habit not found".to_string()))
}

/// Delete a habit and refresh its owner's sustainability score.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let user_id = owner_of(&mut tx, id).await?;
    lock_owner(&mut tx, user_id).await?;

    sqlx::query_scalar::<_, Uuid>("DELETE FROM habits WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".to_string()))?;

    let (completed, total) = completion_counts(&mut tx, user_id).await?;
    sqlx::query("UPDATE users SET sustainability_score = $2 WHERE id = $1")
        .bind(user_id)
        .bind(rewards::sustainability_score(completed, total))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(habit_id = %id, user_id = %user_id, "Habit deleted");
    Ok(())
}

/// Mark a habit completed and grant its owner's rewards, atomically.
pub async fn complete(pool: &PgPool, id: Uuid) -> Result<HabitCompletion, AppError> {
    let mut tx = pool.begin().await?;

    let user_id = owner_of(&mut tx, id).await?;
    let held_badges = lock_owner(&mut tx, user_id).await?;

    let is_completed: bool =
        sqlx::query_scalar("SELECT is_completed FROM habits WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Habit not found".to_string()))?;

    if is_completed {
        return Err(AppError::InvalidTransition(
            "Habit is already completed".to_string(),
        ));
    }

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        UPDATE habits SET is_completed = true, completed_date = NOW(), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    let (completed, total) = completion_counts(&mut tx, user_id).await?;
    let reward = rewards::on_completion(completed, total, &held_badges);

    sqlx::query(
        r#"
        UPDATE users SET
            green_points = green_points + $2,
            badges = badges || $3,
            sustainability_score = $4
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(reward.points_earned)
    .bind(&reward.new_badges)
    .bind(reward.sustainability_score)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        habit_id = %id,
        user_id = %user_id,
        points = reward.points_earned,
        new_badges = ?reward.new_badges,
        "Habit completed"
    );

    Ok(HabitCompletion {
        message: "Habit completed".to_string(),
        habit,
        points_earned: reward.points_earned,
        new_badges: reward.new_badges,
    })
}

/// Load completions and summarize the week ending today in `offset`.
pub async fn weekly_summary(
    pool: &PgPool,
    user_id: Uuid,
    offset: &FixedOffset,
) -> Result<WeeklySummary, AppError> {
    let completed = sqlx::query_as::<_, Habit>(
        r#"
        SELECT * FROM habits
        WHERE user_id = $1 AND is_completed = true AND completed_date >= $2
        ORDER BY completed_date DESC
        "#,
    )
    .bind(user_id)
    // One extra day of slack; exact local-date filtering happens in summarize_week.
    .bind(Utc::now() - Duration::days(WEEK_DAYS + 1))
    .fetch_all(pool)
    .await?;

    let today = Utc::now().with_timezone(offset).date_naive();
    Ok(summarize_week(&completed, today, offset))
}

/// Per-day and per-category completion totals for the [`WEEK_DAYS`] days ending `today`.
pub fn summarize_week(habits: &[Habit], today: NaiveDate, offset: &FixedOffset) -> WeeklySummary {
    let start_date = today - Duration::days(WEEK_DAYS - 1);

    let mut days: Vec<DaySummary> = (0..WEEK_DAYS)
        .map(|i| DaySummary {
            date: start_date + Duration::days(i),
            completed: 0,
            carbon_saved: Decimal::ZERO,
        })
        .collect();
    let mut by_category: Vec<CategoryCount> = HabitCategory::ALL
        .iter()
        .map(|&category| CategoryCount {
            category,
            completed: 0,
        })
        .collect();

    for habit in habits.iter().filter(|h| h.is_completed) {
        let Some(done) = habit.completed_date else {
            continue;
        };
        let local = done.with_timezone(offset).date_naive();
        if local < start_date || local > today {
            continue;
        }

        let day = &mut days[(local - start_date).num_days() as usize];
        day.completed += 1;
        day.carbon_saved += habit.carbon_footprint;

        if let Some(entry) = by_category.iter_mut().find(|c| c.category == habit.category) {
            entry.completed += 1;
        }
    }

    WeeklySummary {
        start_date,
        end_date: today,
        total_completed: days.iter().map(|d| d.completed).sum(),
        carbon_saved: days.iter().map(|d| d.carbon_saved).sum(),
        days,
        by_category,
    }
}

/// Owner of a habit, read without locking.
async fn owner_of(tx: &mut Transaction<'_, Postgres>, habit_id: Uuid) -> Result<Uuid, AppError> {
    sqlx::query_scalar("SELECT user_id FROM habits WHERE id = $1")
        .bind(habit_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".to_string()))
}

/// Row-lock the owner and return the badges they hold.
///
/// Every write that touches a user's habits and rewards takes this lock
/// before any habit row lock, so those writes serialize per user.
async fn lock_owner(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar("SELECT badges FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// (completed, total) habit counts for a user.
async fn completion_counts(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<(i64, i64), AppError> {
    let counts: (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*) FILTER (WHERE is_completed), COUNT(*) FROM habits WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(counts)
}
