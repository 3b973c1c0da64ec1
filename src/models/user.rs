//! User model with goal preferences and sustainability rewards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    Member,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "diet_preference", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DietPreference {
    Standard,
    Flexitarian,
    Vegetarian,
    Vegan,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transport_preference", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransportPreference {
    Car,
    PublicTransport,
    Bike,
    Walk,
    Mixed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "energy_preference", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnergyPreference {
    Standard,
    Conservative,
    Minimal,
    Renewable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "waste_preference", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WastePreference {
    Standard,
    Recycle,
    Compost,
    ZeroWaste,
}

/// Full user row from database. Includes password_hash, never serialize to API.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub sustainability_score: i32,
    pub green_points: i32,
    pub badges: Vec<String>,
    pub diet: DietPreference,
    pub transport: TransportPreference,
    pub energy_use: EnergyPreference,
    pub waste_management: WastePreference,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Display name: "First Last" when both are set, else first name, else username.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{first} {last}")
            }
            (Some(first), _) if !first.is_empty() => first.to_string(),
            _ => self.username.clone(),
        }
    }

    pub fn preferences(&self) -> GoalPreferences {
        GoalPreferences {
            diet: self.diet,
            transport: self.transport,
            energy_use: self.energy_use,
            waste_management: self.waste_management,
        }
    }
}

/// Structured goal preferences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalPreferences {
    pub diet: DietPreference,
    pub transport: TransportPreference,
    pub energy_use: EnergyPreference,
    pub waste_management: WastePreference,
}

/// User response DTO, excludes password_hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub sustainability_score: i32,
    pub green_points: i32,
    pub badges: Vec<String>,
    pub goal_preferences: GoalPreferences,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            name: u.display_name(),
            goal_preferences: u.preferences(),
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            sustainability_score: u.sustainability_score,
            green_points: u.green_points,
            badges: u.badges,
            created_at: u.created_at,
            last_active: u.last_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferences {
    pub goal_preferences: GoalPreferences,
}

/// Sustainability stats subset of the user record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub sustainability_score: i32,
    pub green_points: i32,
    pub badges: Vec<String>,
}

impl From<&User> for UserStats {
    fn from(u: &User) -> Self {
        Self {
            sustainability_score: u.sustainability_score,
            green_points: u.green_points,
            badges: u.badges.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserBadges {
    pub badges: Vec<String>,
}
