use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};

use crate::db::Database;
use crate::models::{MealSummary, MealWithFoods, NewMeal};

/// Settings key under which the daily calorie goal is stored.
pub const DAILY_GOAL_KEY: &str = "daily_goal";

/// Handle over the meal database.
///
/// Owns the single connection behind a mutex, so one process-wide store can
/// be shared between callers: concurrent calls queue on the lock rather than
/// race, and `save_meal` holds it for the whole upsert-delete-insert
/// sequence. Tests construct an in-memory store per run instead of sharing
/// process state.
pub struct MealStore {
    db: Mutex<Database>,
}

impl MealStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            db: Mutex::new(Database::open(path)?),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            db: Mutex::new(Database::open_in_memory()?),
        })
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| anyhow!("meal store connection lock poisoned"))
    }

    // --- Meals ---

    pub fn save_meal(&self, input: &NewMeal) -> Result<()> {
        self.db()?.save_meal(input).context("Failed to save meal")
    }

    pub fn get_meals(&self) -> Result<Vec<MealSummary>> {
        self.db()?.list_meals()
    }

    pub fn get_meal_by_id(&self, meal_id: &str) -> Result<Option<MealWithFoods>> {
        self.db()?.get_meal_with_foods(meal_id)
    }

    /// Delete a meal and its foods. Returns false when nothing existed to
    /// delete; that is a normal outcome, not an error.
    pub fn delete_meal(&self, meal_id: &str) -> Result<bool> {
        self.db()?.delete_meal(meal_id)
    }

    // --- Daily goal ---

    /// The stored daily calorie goal, or `default` when no goal was ever set
    /// or the stored value does not parse to a finite positive number.
    pub fn get_daily_goal(&self, default: f64) -> Result<f64> {
        let stored = self.db()?.get_setting(DAILY_GOAL_KEY)?;
        Ok(stored
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|goal| goal.is_finite() && *goal > 0.0)
            .unwrap_or(default))
    }

    /// Store the daily goal. Rejecting non-positive input is the caller's
    /// responsibility; the store writes whatever it is given.
    pub fn set_daily_goal(&self, goal: f64) -> Result<()> {
        self.db()?.set_setting(DAILY_GOAL_KEY, &goal.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewFood;

    fn pomme() -> NewFood {
        NewFood {
            id: "f1".to_string(),
            name: "Pomme".to_string(),
            brand: None,
            image_url: None,
            nutriscore: Some("A".to_string()),
            calories: Some(52.0),
            proteins: None,
            carbs: None,
            fats: None,
        }
    }

    fn dejeuner() -> NewMeal {
        NewMeal {
            id: "1".to_string(),
            name: "Dejeuner".to_string(),
            date: "2024-01-01T12:00:00Z".to_string(),
            foods: vec![pomme()],
        }
    }

    #[test]
    fn test_save_and_list() {
        let store = MealStore::open_in_memory().unwrap();
        store.save_meal(&dejeuner()).unwrap();

        let meals = store.get_meals().unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "1");
        assert_eq!(meals[0].name, "Dejeuner");
        assert!((meals[0].total_calories - 52.0).abs() < 0.01);
    }

    #[test]
    fn test_get_meal_by_id() {
        let store = MealStore::open_in_memory().unwrap();
        store.save_meal(&dejeuner()).unwrap();

        let fetched = store.get_meal_by_id("1").unwrap().unwrap();
        assert_eq!(fetched.foods.len(), 1);
        assert_eq!(fetched.foods[0].name, "Pomme");
        assert!((fetched.foods[0].calories - 52.0).abs() < f64::EPSILON);
        assert_eq!(fetched.foods[0].proteins, 0.0);
        assert_eq!(fetched.foods[0].carbs, 0.0);
        assert_eq!(fetched.foods[0].fats, 0.0);

        assert!(store.get_meal_by_id("2").unwrap().is_none());
    }

    #[test]
    fn test_delete_meal() {
        let store = MealStore::open_in_memory().unwrap();
        store.save_meal(&dejeuner()).unwrap();

        assert!(store.delete_meal("1").unwrap());
        assert!(store.get_meal_by_id("1").unwrap().is_none());
        // Deleting again is a no-op.
        assert!(!store.delete_meal("1").unwrap());
    }

    #[test]
    fn test_daily_goal_default() {
        let store = MealStore::open_in_memory().unwrap();
        assert!((store.get_daily_goal(2000.0).unwrap() - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_goal_set_and_get() {
        let store = MealStore::open_in_memory().unwrap();
        store.set_daily_goal(2500.0).unwrap();
        assert!((store.get_daily_goal(2000.0).unwrap() - 2500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_goal_bad_stored_value_falls_back() {
        let store = MealStore::open_in_memory().unwrap();
        {
            let db = store.db().unwrap();
            db.set_setting(DAILY_GOAL_KEY, "not a number").unwrap();
        }
        assert!((store.get_daily_goal(2000.0).unwrap() - 2000.0).abs() < f64::EPSILON);

        {
            let db = store.db().unwrap();
            db.set_setting(DAILY_GOAL_KEY, "-5").unwrap();
        }
        assert!((store.get_daily_goal(2000.0).unwrap() - 2000.0).abs() < f64::EPSILON);
    }
}
