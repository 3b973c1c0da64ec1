//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const DEMO_EMAIL: &str = "demo@ecohabits.local";
const DEMO_PASSWORD: &str = "GreenDemo123!";
const ADMIN_EMAIL: &str = "admin@ecohabits.local";
const ADMIN_PASSWORD: &str = "AdminDemo123!";

/// (description, category, kg CO2, days ago completed or None for open habits)
const DEMO_HABITS: &[(&str, &str, i64, Option<i64>)] = &[
    ("Cycled to work instead of driving", "transport", 52, Some(0)),
    ("Vegetarian lunch", "diet", 15, Some(0)),
    ("Unplugged idle electronics", "energy", 8, Some(1)),
    ("Took the train to the city", "transport", 64, Some(2)),
    ("Composted kitchen scraps", "waste", 6, Some(3)),
    ("Five-minute shower", "water", 3, Some(6)),
    ("Bring a reusable bottle", "waste", 2, None),
    ("Line-dry the laundry", "energy", 23, None),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = ecohabits::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    ecohabits::db::run_migrations(&pool).await?;

    println!("=== EcoHabits Seed Script ===");

    seed_admin_user(&pool).await?;
    let demo_id = seed_demo_user(&pool).await?;
    seed_demo_habits(&pool, demo_id).await?;

    println!("\n=== Seed complete! ===");
    println!("Demo login: {DEMO_EMAIL} / {DEMO_PASSWORD}");
    println!("Admin login: {ADMIN_EMAIL} / {ADMIN_PASSWORD}");

    Ok(())
}

async fn seed_admin_user(pool: &PgPool) -> anyhow::Result<()> {
    let hash = ecohabits::services::auth::hash_password(ADMIN_PASSWORD)?;
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, first_name, role)
         VALUES ('admin', $1, $2, 'Admin', 'Admin')
         ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash",
    )
    .bind(ADMIN_EMAIL)
    .bind(&hash)
    .execute(pool)
    .await?;

    println!("[done] Admin user");
    Ok(())
}

async fn seed_demo_user(pool: &PgPool) -> anyhow::Result<Uuid> {
    let hash = ecohabits::services::auth::hash_password(DEMO_PASSWORD)?;
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash, first_name, last_name, diet, transport)
         VALUES ('demo', $1, $2, 'Robin', 'Green', 'flexitarian', 'bike')
         ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
         RETURNING id",
    )
    .bind(DEMO_EMAIL)
    .bind(&hash)
    .fetch_one(pool)
    .await?;

    println!("[done] Demo user {id}");
    Ok(id)
}

async fn seed_demo_habits(pool: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM habits WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Demo habits already exist ({count})");
        return Ok(());
    }

    let now = Utc::now();
    for (description, category, tenths_kg, completed_days_ago) in DEMO_HABITS {
        let completed_date = completed_days_ago.map(|d| now - Duration::days(d));
        let date = completed_date.unwrap_or(now) - Duration::hours(2);

        sqlx::query(
            "INSERT INTO habits (user_id, description, category, carbon_footprint,
                 is_completed, completed_date, date, created_at)
             VALUES ($1, $2, $3::habit_category, $4, $5, $6, $7, $7)",
        )
        .bind(user_id)
        .bind(description)
        .bind(category)
        .bind(Decimal::new(*tenths_kg, 1))
        .bind(completed_date.is_some())
        .bind(completed_date)
        .bind(date)
        .execute(pool)
        .await?;
    }

    let completed = DEMO_HABITS.iter().filter(|h| h.3.is_some()).count() as i64;
    let total = DEMO_HABITS.len() as i64;
    let badges = ecohabits::services::rewards::newly_earned_badges(completed, &[]);
    sqlx::query(
        "UPDATE users SET green_points = $2, badges = $3, sustainability_score = $4 WHERE id = $1",
    )
    .bind(user_id)
    .bind(completed as i32 * ecohabits::services::rewards::POINTS_PER_COMPLETION)
    .bind(&badges)
    .bind(ecohabits::services::rewards::sustainability_score(completed, total))
    .execute(pool)
    .await?;

    println!("[done] {} demo habits ({completed} completed)", DEMO_HABITS.len());
    Ok(())
}
