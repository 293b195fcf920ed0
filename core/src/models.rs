use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Default daily calorie goal shown before the user sets one.
pub const DEFAULT_DAILY_GOAL: f64 = 2000.0;

/// Meal-type labels used by the app's meal picker.
pub const MEAL_TYPES: &[&str] = &["Petit-dejeuner", "Dejeuner", "Diner", "Snack"];

#[derive(Debug, Clone, Serialize)]
pub struct FoodRecord {
    pub id: String,
    pub meal_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub nutriscore: Option<String>,
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// One row of the meal list: identity plus the summed calories of its foods.
#[derive(Debug, Clone, Serialize)]
pub struct MealSummary {
    pub id: String,
    pub name: String,
    pub date: String,
    pub total_calories: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealWithFoods {
    pub id: String,
    pub name: String,
    pub date: String,
    pub foods: Vec<FoodRecord>,
}

#[derive(Debug, Clone)]
pub struct NewFood {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub nutriscore: Option<String>,
    pub calories: Option<f64>,
    pub proteins: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

impl From<FoodRecord> for NewFood {
    fn from(food: FoodRecord) -> Self {
        Self {
            id: food.id,
            name: food.name,
            brand: food.brand,
            image_url: food.image_url,
            nutriscore: food.nutriscore,
            calories: Some(food.calories),
            proteins: Some(food.proteins),
            carbs: Some(food.carbs),
            fats: Some(food.fats),
        }
    }
}

/// Input for a save: the meal identity and its complete food set.
/// Saving replaces any previous food set stored under the same id.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub id: String,
    pub name: String,
    pub date: String,
    pub foods: Vec<NewFood>,
}

pub fn validate_meal_type(meal: &str) -> Result<String> {
    let lower = meal.to_lowercase();
    match MEAL_TYPES.iter().find(|t| t.to_lowercase() == lower) {
        Some(canonical) => Ok((*canonical).to_string()),
        None => anyhow::bail!(
            "Invalid meal type '{meal}'. Must be one of: {}",
            MEAL_TYPES.join(", ")
        ),
    }
}

/// Coerce an optional macro value for storage: missing or non-finite becomes 0.
#[must_use]
pub fn coerce_macro(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Local calendar-day key (`YYYY-MM-DD`) of an RFC 3339 timestamp, or `None`
/// if the timestamp does not parse. Two meals share a day when their keys match.
#[must_use]
pub fn day_key(timestamp: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_meal_type() {
        assert_eq!(validate_meal_type("Dejeuner").unwrap(), "Dejeuner");
        assert_eq!(validate_meal_type("dejeuner").unwrap(), "Dejeuner");
        assert_eq!(validate_meal_type("SNACK").unwrap(), "Snack");
        assert_eq!(
            validate_meal_type("petit-dejeuner").unwrap(),
            "Petit-dejeuner"
        );
    }

    #[test]
    fn test_validate_meal_type_invalid() {
        assert!(validate_meal_type("brunch").is_err());
        assert!(validate_meal_type("").is_err());
    }

    #[test]
    fn test_coerce_macro() {
        assert_eq!(coerce_macro(Some(52.0)), 52.0);
        assert_eq!(coerce_macro(None), 0.0);
        assert_eq!(coerce_macro(Some(f64::NAN)), 0.0);
        assert_eq!(coerce_macro(Some(f64::INFINITY)), 0.0);
        assert_eq!(coerce_macro(Some(f64::NEG_INFINITY)), 0.0);
    }

    #[test]
    fn test_day_key_same_instant() {
        // Same instant in two offsets maps to the same local day.
        let utc = day_key("2024-01-01T22:00:00Z").unwrap();
        let paris = day_key("2024-01-01T23:00:00+01:00").unwrap();
        assert_eq!(utc, paris);
    }

    #[test]
    fn test_day_key_invalid() {
        assert!(day_key("not a date").is_none());
        assert!(day_key("2024-01-01").is_none());
    }

    #[test]
    fn test_new_food_from_record() {
        let record = FoodRecord {
            id: "f1".to_string(),
            meal_id: "m1".to_string(),
            name: "Pomme".to_string(),
            brand: None,
            image_url: None,
            nutriscore: Some("A".to_string()),
            calories: 52.0,
            proteins: 0.3,
            carbs: 14.0,
            fats: 0.2,
        };
        let food = NewFood::from(record);
        assert_eq!(food.id, "f1");
        assert_eq!(food.calories, Some(52.0));
        assert_eq!(food.nutriscore.as_deref(), Some("A"));
    }
}
