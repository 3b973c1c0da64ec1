//! Green points, badges, and sustainability score.
//!
//! Rewards are granted on habit completion. Badges are keyed on the number of
//! completed habits and are never revoked.

use serde::Serialize;

/// Green points earned per completed habit.
pub const POINTS_PER_COMPLETION: i32 = 10;

/// Badge thresholds, in completed-habit counts.
pub const BADGE_THRESHOLDS: [(i64, &str); 4] = [
    (1, "First Step"),
    (10, "Eco Warrior"),
    (50, "Planet Protector"),
    (100, "Sustainability Champion"),
];

/// Outcome of applying a completion to a user's reward state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardUpdate {
    pub points_earned: i32,
    pub new_badges: Vec<String>,
    pub sustainability_score: i32,
}

/// Badges unlocked at `completed` that the user does not hold yet.
pub fn newly_earned_badges(completed: i64, held: &[String]) -> Vec<String> {
    BADGE_THRESHOLDS
        .iter()
        .filter(|(threshold, _)| completed >= *threshold)
        .map(|(_, name)| *name)
        .filter(|name| !held.iter().any(|h| h == name))
        .map(str::to_string)
        .collect()
}

/// Share of habits completed, as a 0–100 percentage. Zero when there are no habits.
pub fn sustainability_score(completed: i64, total: i64) -> i32 {
    if total <= 0 {
        return 0;
    }
    let ratio = completed.clamp(0, total) as f64 / total as f64;
    (ratio * 100.0).round() as i32
}

/// Compute the rewards for one more completion given post-completion counts.
pub fn on_completion(completed: i64, total: i64, held: &[String]) -> RewardUpdate {
    RewardUpdate {
        points_earned: POINTS_PER_COMPLETION,
        new_badges: newly_earned_badges(completed, held),
        sustainability_score: sustainability_score(completed, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_completion_awards_first_step() {
        assert_eq!(newly_earned_badges(1, &[]), vec!["First Step"]);
    }

    #[test]
    fn badges_are_awarded_once() {
        let held = vec!["First Step".to_string()];
        assert!(newly_earned_badges(2, &held).is_empty());
        assert_eq!(newly_earned_badges(10, &held), vec!["Eco Warrior"]);
    }

    #[test]
    fn missed_thresholds_are_backfilled() {
        let badges = newly_earned_badges(60, &[]);
        assert_eq!(badges, vec!["First Step", "Eco Warrior", "Planet Protector"]);
    }

    #[test]
    fn no_badges_before_first_completion() {
        assert!(newly_earned_badges(0, &[]).is_empty());
    }

    #[test]
    fn score_is_completion_percentage() {
        assert_eq!(sustainability_score(0, 0), 0);
        assert_eq!(sustainability_score(0, 5), 0);
        assert_eq!(sustainability_score(1, 3), 33);
        assert_eq!(sustainability_score(2, 3), 67);
        assert_eq!(sustainability_score(4, 4), 100);
    }

    #[test]
    fn score_never_exceeds_100() {
        assert_eq!(sustainability_score(7, 4), 100);
    }

    #[test]
    fn completion_update_combines_rewards() {
        let update = on_completion(1, 2, &[]);
        assert_eq!(update.points_earned, POINTS_PER_COMPLETION);
        assert_eq!(update.new_badges, vec!["First Step"]);
        assert_eq!(update.sustainability_score, 50);
    }
}
