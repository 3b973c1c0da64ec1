//! Static catalogue of suggested sustainability challenges.

use serde::Serialize;

use crate::models::habit::HabitCategory;

/// Number of challenges suggested on the dashboard.
pub const UPCOMING_CHALLENGE_COUNT: usize = 3;

/// A suggested challenge template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Challenge {
    pub title: &'static str,
    pub description: &'static str,
    pub impact: &'static str,
    pub category: HabitCategory,
}

pub static CATALOGUE: [Challenge; 6] = [
    Challenge {
        title: "Meatless Monday",
        description: "Skip meat for a full day",
        impact: "Saves ~8kg of CO2",
        category: HabitCategory::Diet,
    },
    Challenge {
        title: "Energy Saver",
        description: "Reduce electricity usage by 10%",
        impact: "Saves ~5kg of CO2",
        category: HabitCategory::Energy,
    },
    Challenge {
        title: "Zero Waste Day",
        description: "Produce no waste for 24 hours",
        impact: "Prevents landfill waste",
        category: HabitCategory::Waste,
    },
    Challenge {
        title: "Public Transport Day",
        description: "Use only public transport or bike",
        impact: "Saves ~3kg of CO2",
        category: HabitCategory::Transport,
    },
    Challenge {
        title: "Water Conservation",
        description: "Reduce water usage by 20%",
        impact: "Saves ~2kg of CO2",
        category: HabitCategory::Water,
    },
    Challenge {
        title: "Plastic-Free Day",
        description: "Avoid all single-use plastic",
        impact: "Prevents plastic waste",
        category: HabitCategory::Waste,
    },
];

/// Challenges to suggest next: the head of the catalogue, in catalogue order.
///
/// Suggestions do not depend on the user's history. Category-aware
/// prioritization was never observable in the product, so it is not done here.
pub fn upcoming() -> Vec<Challenge> {
    CATALOGUE
        .iter()
        .take(UPCOMING_CHALLENGE_COUNT)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upcoming_is_catalogue_head() {
        let titles: Vec<_> = upcoming().iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Meatless Monday", "Energy Saver", "Zero Waste Day"]);
    }

    #[test]
    fn challenge_serializes_with_category() {
        let json = serde_json::to_value(CATALOGUE[3]).unwrap();
        assert_eq!(json["title"], "Public Transport Day");
        assert_eq!(json["impact"], "Saves ~3kg of CO2");
        assert_eq!(json["category"], "transport");
    }
}
