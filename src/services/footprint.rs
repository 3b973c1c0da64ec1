//! Carbon footprint estimate from transport, home energy, and food quantities.
//!
//! A fixed linear weighted sum; factors are kg CO2 per unit.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;

pub const CAR_KG_PER_KM: f64 = 2.3;
pub const BUS_KG_PER_KM: f64 = 0.1;
pub const TRAIN_KG_PER_KM: f64 = 0.04;
pub const PLANE_KG_PER_KM: f64 = 0.25;

pub const ELECTRICITY_KG_PER_KWH: f64 = 0.5;
pub const GAS_KG_PER_KWH: f64 = 0.2;
pub const OIL_KG_PER_LITER: f64 = 0.25;

pub const MEAT_KG_PER_MEAL: f64 = 6.0;
pub const VEGETARIAN_KG_PER_MEAL: f64 = 1.5;
pub const VEGAN_KG_PER_MEAL: f64 = 1.0;

/// Every quantity is bounded to `0..=1e9` so the weighted sum stays finite.
pub const MAX_QUANTITY: f64 = 1.0e9;

/// CO2 one tree absorbs per year.
const TREE_KG_PER_YEAR: f64 = 21.0;
/// CO2 emitted by one flight.
const FLIGHT_KG: f64 = 500.0;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportationInput {
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub car_km: f64,
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub bus_km: f64,
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub train_km: f64,
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub plane_km: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeInput {
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub electricity_kwh: f64,
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub gas_kwh: f64,
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub oil_liters: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FoodInput {
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub meat_meals: f64,
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub vegetarian_meals: f64,
    #[validate(range(min = 0.0, max = MAX_QUANTITY))]
    pub vegan_meals: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct FootprintInput {
    #[validate(nested)]
    pub transportation: TransportationInput,
    #[validate(nested)]
    pub home: HomeInput,
    #[validate(nested)]
    pub food: FoodInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparisons {
    pub trees: f64,
    pub flights: f64,
    pub driving: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootprintResult {
    pub transportation: f64,
    pub home: f64,
    pub food: f64,
    pub total: f64,
    pub comparisons: Comparisons,
}

/// Validate and compute.
pub fn calculate(input: &FootprintInput) -> Result<FootprintResult, AppError> {
    input.validate()?;
    Ok(compute(input))
}

pub fn compute(input: &FootprintInput) -> FootprintResult {
    let t = &input.transportation;
    let transportation = t.car_km * CAR_KG_PER_KM
        + t.bus_km * BUS_KG_PER_KM
        + t.train_km * TRAIN_KG_PER_KM
        + t.plane_km * PLANE_KG_PER_KM;

    let h = &input.home;
    let home = h.electricity_kwh * ELECTRICITY_KG_PER_KWH
        + h.gas_kwh * GAS_KG_PER_KWH
        + h.oil_liters * OIL_KG_PER_LITER;

    let f = &input.food;
    let food = f.meat_meals * MEAT_KG_PER_MEAL
        + f.vegetarian_meals * VEGETARIAN_KG_PER_MEAL
        + f.vegan_meals * VEGAN_KG_PER_MEAL;

    let total = transportation + home + food;

    FootprintResult {
        transportation,
        home,
        food,
        total,
        comparisons: Comparisons {
            trees: (total / TREE_KG_PER_YEAR).round(),
            flights: (total / FLIGHT_KG).round(),
            // Hundreds of km driven by car.
            driving: (total / CAR_KG_PER_KM / 100.0).round(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn zero_input_is_zero() {
        let result = compute(&FootprintInput::default());
        assert_eq!(result.total, 0.0);
        assert_eq!(
            result.comparisons,
            Comparisons {
                trees: 0.0,
                flights: 0.0,
                driving: 0.0
            }
        );
    }

    #[test]
    fn weighted_sum_per_section() {
        let input = FootprintInput {
            transportation: TransportationInput {
                car_km: 100.0,
                bus_km: 50.0,
                train_km: 200.0,
                plane_km: 1000.0,
            },
            home: HomeInput {
                electricity_kwh: 300.0,
                gas_kwh: 100.0,
                oil_liters: 20.0,
            },
            food: FoodInput {
                meat_meals: 7.0,
                vegetarian_meals: 4.0,
                vegan_meals: 2.0,
            },
        };
        let result = compute(&input);
        // 230 + 5 + 8 + 250
        assert!(approx(result.transportation, 493.0));
        // 150 + 20 + 5
        assert!(approx(result.home, 175.0));
        // 42 + 6 + 2
        assert!(approx(result.food, 50.0));
        assert!(approx(result.total, 718.0));

        assert_eq!(result.comparisons.trees, 34.0);
        assert_eq!(result.comparisons.flights, 1.0);
        assert_eq!(result.comparisons.driving, 3.0);
    }

    #[test]
    fn comparisons_round_half_away_from_zero() {
        // 10.5 meals of vegan food = 10.5 kg; 10.5 / 21 = 0.5 trees.
        let input = FootprintInput {
            food: FoodInput {
                vegan_meals: 10.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(compute(&input).comparisons.trees, 1.0);
    }

    #[test]
    fn negative_quantities_rejected() {
        let input = FootprintInput {
            home: HomeInput {
                gas_kwh: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            calculate(&input),
            Err(AppError::Validation(msg)) if msg.contains("home")
        ));
    }

    #[test]
    fn huge_quantities_rejected() {
        let input = FootprintInput {
            transportation: TransportationInput {
                plane_km: 1e308,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            calculate(&input),
            Err(AppError::Validation(msg)) if msg.contains("transportation")
        ));
    }

    #[test]
    fn largest_accepted_quantities_stay_finite() {
        let input = FootprintInput {
            transportation: TransportationInput {
                car_km: MAX_QUANTITY,
                bus_km: MAX_QUANTITY,
                train_km: MAX_QUANTITY,
                plane_km: MAX_QUANTITY,
            },
            home: HomeInput {
                electricity_kwh: MAX_QUANTITY,
                gas_kwh: MAX_QUANTITY,
                oil_liters: MAX_QUANTITY,
            },
            food: FoodInput {
                meat_meals: MAX_QUANTITY,
                vegetarian_meals: MAX_QUANTITY,
                vegan_meals: MAX_QUANTITY,
            },
        };
        let result = calculate(&input).unwrap();
        assert!(result.total.is_finite());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["total"].is_number());
        assert!(json["comparisons"]["trees"].is_number());
    }

    #[test]
    fn missing_sections_default_to_zero() {
        let input: FootprintInput =
            serde_json::from_value(serde_json::json!({ "transportation": { "carKm": 10 } }))
                .unwrap();
        let result = calculate(&input).unwrap();
        assert!(approx(result.total, 23.0));
    }
}
