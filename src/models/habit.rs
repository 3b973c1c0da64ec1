//! Habit records: user-logged sustainable actions with a CO2 impact estimate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[sqlx(type_name = "habit_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    Transport,
    Energy,
    Diet,
    Waste,
    Water,
    Other,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 6] = [
        HabitCategory::Transport,
        HabitCategory::Energy,
        HabitCategory::Diet,
        HabitCategory::Waste,
        HabitCategory::Water,
        HabitCategory::Other,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub category: HabitCategory,
    /// kg CO2 saved by this habit.
    pub carbon_footprint: Decimal,
    pub sustainable_alternative: Option<String>,
    pub is_completed: bool,
    pub completed_date: Option<DateTime<Utc>>,
    /// Record date; what "recent" ordering is based on.
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabit {
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    pub category: HabitCategory,
    #[validate(custom(function = "non_negative"))]
    pub carbon_footprint: Decimal,
    #[validate(length(max = 500))]
    pub sustainable_alternative: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Editable habit fields. Completion state is changed only via the complete action.
#[derive(Debug, Clone, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabit {
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,
    pub category: Option<HabitCategory>,
    #[validate(custom(function = "non_negative"))]
    pub carbon_footprint: Option<Decimal>,
    #[validate(length(max = 500))]
    pub sustainable_alternative: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HabitFilters {
    pub category: Option<HabitCategory>,
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn create(footprint: Decimal) -> CreateHabit {
        CreateHabit {
            description: "Cycle to work".to_string(),
            category: HabitCategory::Transport,
            carbon_footprint: footprint,
            sustainable_alternative: None,
            date: None,
        }
    }

    #[test]
    fn category_wire_names() {
        let json = serde_json::to_string(&HabitCategory::Water).unwrap();
        assert_eq!(json, "\"water\"");
        let parsed: HabitCategory = serde_json::from_str("\"diet\"").unwrap();
        assert_eq!(parsed, HabitCategory::Diet);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(serde_json::from_str::<HabitCategory>("\"shopping\"").is_err());
    }

    #[test]
    fn negative_footprint_fails_validation() {
        assert!(create(dec!(-0.5)).validate().is_err());
        assert!(create(dec!(0)).validate().is_ok());
        assert!(create(dec!(3.25)).validate().is_ok());
    }

    #[test]
    fn update_validates_present_fields_only() {
        assert!(UpdateHabit::default().validate().is_ok());

        let update = UpdateHabit {
            carbon_footprint: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateHabit {
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn create_habit_accepts_float_footprint() {
        let input: CreateHabit = serde_json::from_value(serde_json::json!({
            "description": "Meatless lunch",
            "category": "diet",
            "carbonFootprint": 2.5
        }))
        .unwrap();
        assert_eq!(input.carbon_footprint, dec!(2.5));
        assert!(input.date.is_none());
    }
}
