//! Per-user dashboard aggregation: completions, carbon saved, streak, recent
//! activity, and suggested challenges.
//!
//! The aggregation itself ([`build`]) is pure; [`get_dashboard`] only performs
//! the two reads it needs. Those reads are not snapshot-isolated, so a habit
//! changed between them can produce a slightly torn view.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::habit::Habit;
use crate::services::challenges::{self, Challenge};
use crate::services::{habit as habit_service, user as user_service};

/// Streaks are not reported past this many days.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Number of entries in the recent activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Derived dashboard view. Recomputed on every request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub eco_challenges_completed: i64,
    /// kg CO2, rounded half-up to one decimal.
    pub carbon_saved: Decimal,
    pub streak_days: u32,
    pub recent_activities: Vec<RecentActivity>,
    pub upcoming_challenges: Vec<Challenge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ActivityAction {
    #[serde(rename = "Completed challenge")]
    CompletedChallenge,
    #[serde(rename = "New habit")]
    NewHabit,
}

/// Entry in the recent activity feed.
#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    pub action: ActivityAction,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Load the user's habits and aggregate them. Fails with `NotFound` if the user does not exist.
pub async fn get_dashboard(
    pool: &PgPool,
    user_id: Uuid,
    offset: &FixedOffset,
) -> Result<DashboardView, AppError> {
    let (user, habits) = tokio::try_join!(
        user_service::find_optional(pool, user_id),
        habit_service::list_for_user(pool, user_id, None),
    )?;

    if user.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let today = Utc::now().with_timezone(offset).date_naive();
    let view = build(habits, today, offset);

    tracing::debug!(
        user_id = %user_id,
        completed = view.eco_challenges_completed,
        streak_days = view.streak_days,
        "Dashboard aggregated"
    );
    Ok(view)
}

/// Aggregate a user's habits into the dashboard view.
///
/// `today` is the current calendar date in `offset`, which is also used to
/// turn completion timestamps into dates.
pub fn build(mut habits: Vec<Habit>, today: NaiveDate, offset: &FixedOffset) -> DashboardView {
    // Storage order is not trusted. Stable sort keeps ties in input order.
    habits.sort_by(|a, b| b.date.cmp(&a.date));

    let completed: Vec<&Habit> = habits.iter().filter(|h| h.is_completed).collect();

    DashboardView {
        eco_challenges_completed: completed.len() as i64,
        carbon_saved: carbon_saved(&completed),
        streak_days: streak_days(&completion_dates(&completed, offset), today),
        recent_activities: recent_activities(&habits),
        upcoming_challenges: challenges::upcoming(),
    }
}

/// Sum of completed footprints, rounded half-up to one decimal.
fn carbon_saved(completed: &[&Habit]) -> Decimal {
    round_one_decimal(completed.iter().map(|h| h.carbon_footprint).sum())
}

pub fn round_one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Distinct local calendar dates carrying at least one completion.
fn completion_dates(completed: &[&Habit], offset: &FixedOffset) -> HashSet<NaiveDate> {
    completed
        .iter()
        .filter_map(|h| h.completed_date)
        .map(|ts| ts.with_timezone(offset).date_naive())
        .collect()
}

/// Consecutive days with a completion, ending today or yesterday.
///
/// A streak whose latest day is older than yesterday is broken and counts as 0.
pub fn streak_days(dates: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if dates.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if dates.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 1;
    while streak < MAX_STREAK_DAYS {
        match cursor.pred_opt() {
            Some(prev) if dates.contains(&prev) => {
                cursor = prev;
                streak += 1;
            }
            _ => break,
        }
    }
    streak
}

/// Newest habits first, labelled by completion state. Expects `habits` sorted by date descending.
fn recent_activities(habits: &[Habit]) -> Vec<RecentActivity> {
    habits
        .iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|h| {
            if h.is_completed {
                RecentActivity {
                    action: ActivityAction::CompletedChallenge,
                    description: h.description.clone(),
                    date: h.completed_date.unwrap_or(h.date),
                }
            } else {
                RecentActivity {
                    action: ActivityAction::NewHabit,
                    description: h.description.clone(),
                    date: h.date,
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::habit::HabitCategory;
    use chrono::{Duration, NaiveTime, TimeZone};
    use rust_decimal_macros::dec;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    /// Noon UTC, `days_ago` days before `today()`.
    fn noon(days_ago: i64) -> DateTime<Utc> {
        let date = today() - Duration::days(days_ago);
        Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()))
    }

    fn habit(description: &str, footprint: Decimal, completed_days_ago: Option<i64>) -> Habit {
        let completed_date = completed_days_ago.map(noon);
        let date = completed_date.unwrap_or_else(|| noon(0));
        Habit {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            description: description.to_string(),
            category: HabitCategory::Other,
            carbon_footprint: footprint,
            sustainable_alternative: None,
            is_completed: completed_date.is_some(),
            completed_date,
            date,
            created_at: date,
            updated_at: date,
        }
    }

    fn dates(days_ago: &[i64]) -> HashSet<NaiveDate> {
        days_ago
            .iter()
            .map(|d| today() - Duration::days(*d))
            .collect()
    }

    #[test]
    fn empty_habits_yield_zeroed_view_with_challenges() {
        let view = build(vec![], today(), &utc());
        assert_eq!(view.eco_challenges_completed, 0);
        assert_eq!(view.carbon_saved, dec!(0));
        assert_eq!(view.streak_days, 0);
        assert!(view.recent_activities.is_empty());
        assert_eq!(view.upcoming_challenges.len(), 3);
    }

    #[test]
    fn two_completions_today() {
        let habits = vec![
            habit("Bike to work", dec!(5.2), Some(0)),
            habit("Line-dry laundry", dec!(6.35), Some(0)),
        ];
        let view = build(habits, today(), &utc());
        assert_eq!(view.eco_challenges_completed, 2);
        assert_eq!(view.carbon_saved, dec!(11.6));
        assert_eq!(view.streak_days, 1);
    }

    #[test]
    fn open_habits_do_not_count() {
        let habits = vec![
            habit("Compost scraps", dec!(4.0), Some(0)),
            habit("Shorter showers", dec!(9.9), None),
        ];
        let view = build(habits, today(), &utc());
        assert_eq!(view.eco_challenges_completed, 1);
        assert_eq!(view.carbon_saved, dec!(4.0));
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_one_decimal(dec!(12.05)), dec!(12.1));
        assert_eq!(round_one_decimal(dec!(12.04)), dec!(12.0));
        assert_eq!(round_one_decimal(dec!(12.15)), dec!(12.2));
        assert_eq!(round_one_decimal(dec!(11.55)), dec!(11.6));
    }

    #[test]
    fn carbon_saved_serializes_as_number() {
        let habits = vec![habit("Bike", dec!(12.05), Some(0))];
        let json = serde_json::to_value(build(habits, today(), &utc())).unwrap();
        assert_eq!(json["carbonSaved"], serde_json::json!(12.1));
        assert_eq!(json["ecoChallengesCompleted"], 1);
        assert_eq!(json["streakDays"], 1);
    }

    #[test]
    fn three_day_streak() {
        let habits = vec![
            habit("a", dec!(1), Some(0)),
            habit("b", dec!(1), Some(1)),
            habit("c", dec!(1), Some(2)),
        ];
        assert_eq!(build(habits, today(), &utc()).streak_days, 3);
    }

    #[test]
    fn streak_can_end_yesterday() {
        assert_eq!(streak_days(&dates(&[1, 2, 3, 5]), today()), 3);
    }

    #[test]
    fn broken_streak_resets_to_zero() {
        let habits = vec![habit("a", dec!(1), Some(3))];
        assert_eq!(build(habits, today(), &utc()).streak_days, 0);
        assert_eq!(streak_days(&dates(&[2, 3, 4, 5]), today()), 0);
    }

    #[test]
    fn streak_empty_set_is_zero() {
        assert_eq!(streak_days(&HashSet::new(), today()), 0);
    }

    #[test]
    fn multiple_completions_same_day_count_once() {
        let habits = vec![
            habit("a", dec!(1), Some(0)),
            habit("b", dec!(1), Some(0)),
            habit("c", dec!(1), Some(1)),
        ];
        assert_eq!(build(habits, today(), &utc()).streak_days, 2);
    }

    #[test]
    fn streak_caps_at_365() {
        let all: Vec<i64> = (0..400).collect();
        assert_eq!(streak_days(&dates(&all), today()), MAX_STREAK_DAYS);

        let exact: Vec<i64> = (0..365).collect();
        assert_eq!(streak_days(&dates(&exact), today()), 365);

        let short: Vec<i64> = (0..364).collect();
        assert_eq!(streak_days(&dates(&short), today()), 364);
    }

    #[test]
    fn completion_dates_use_operating_offset() {
        // 23:30 UTC on the 17th is already the 18th at UTC+1.
        let late = Utc.with_ymd_and_hms(2026, 10, 17, 23, 30, 0).unwrap();
        let mut h = habit("late night", dec!(1), Some(0));
        h.completed_date = Some(late);
        h.date = late;

        let plus_one = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(build(vec![h.clone()], today(), &plus_one).streak_days, 1);

        // In UTC it falls on yesterday, which still starts a streak.
        assert_eq!(build(vec![h.clone()], today(), &utc()).streak_days, 1);

        // Two days behind at UTC-5 relative to the 19th.
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let day_after = today().succ_opt().unwrap();
        assert_eq!(build(vec![h], day_after, &minus_five).streak_days, 0);
    }

    #[test]
    fn recent_activities_are_ten_newest_sorted() {
        // Insert oldest first to check the aggregator sorts itself.
        let habits: Vec<Habit> = (0..15)
            .rev()
            .map(|d| {
                let mut h = habit(&format!("habit-{d}"), dec!(1), None);
                h.date = noon(d);
                h
            })
            .collect();

        let view = build(habits, today(), &utc());
        assert_eq!(view.recent_activities.len(), RECENT_ACTIVITY_LIMIT);
        let descriptions: Vec<_> = view
            .recent_activities
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        let expected: Vec<String> = (0..10).map(|d| format!("habit-{d}")).collect();
        assert_eq!(descriptions, expected);
    }

    #[test]
    fn recent_activities_are_labelled_by_completion() {
        let mut done = habit("Took the train", dec!(2), Some(0));
        done.date = noon(2);
        let open = habit("Plan a garden", dec!(0), None);

        let view = build(vec![done.clone(), open.clone()], today(), &utc());
        let feed = &view.recent_activities;
        assert_eq!(feed.len(), 2);

        assert_eq!(feed[0].action, ActivityAction::NewHabit);
        assert_eq!(feed[0].date, open.date);

        assert_eq!(feed[1].action, ActivityAction::CompletedChallenge);
        assert_eq!(feed[1].date, done.completed_date.unwrap());

        let json = serde_json::to_value(&feed[1]).unwrap();
        assert_eq!(json["action"], "Completed challenge");
    }

    #[test]
    fn completed_without_timestamp_falls_back_to_record_date() {
        let mut h = habit("legacy", dec!(1), Some(0));
        h.completed_date = None;
        let view = build(vec![h.clone()], today(), &utc());
        assert_eq!(view.recent_activities[0].action, ActivityAction::CompletedChallenge);
        assert_eq!(view.recent_activities[0].date, h.date);
        // No timestamp, no streak day.
        assert_eq!(view.streak_days, 0);
    }

    #[test]
    fn carbon_saved_is_monotonic_in_completions() {
        let mut habits = Vec::new();
        let mut previous = Decimal::ZERO;
        for (i, footprint) in [dec!(0.04), dec!(0), dec!(3.33), dec!(0.01)].into_iter().enumerate() {
            habits.push(habit(&format!("h{i}"), footprint, Some(0)));
            let raw: Decimal = habits.iter().map(|h| h.carbon_footprint).sum();
            assert!(raw >= previous);
            previous = raw;
        }
        let view = build(habits, today(), &utc());
        assert_eq!(view.carbon_saved, dec!(3.4));
    }
}
