use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::models::{FoodRecord, MealSummary, MealWithFoods, NewMeal, coerce_macro};

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", true)?;
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meals (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS foods (
                id TEXT PRIMARY KEY NOT NULL,
                meal_id TEXT NOT NULL REFERENCES meals(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                brand TEXT,
                image_url TEXT,
                nutriscore TEXT,
                calories REAL DEFAULT 0,
                proteins REAL DEFAULT 0,
                carbs REAL DEFAULT 0,
                fats REAL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_foods_meal ON foods(meal_id);
            CREATE INDEX IF NOT EXISTS idx_meals_date ON meals(date);",
        )?;
        Ok(())
    }

    fn food_from_row(row: &rusqlite::Row) -> rusqlite::Result<FoodRecord> {
        Ok(FoodRecord {
            id: row.get(0)?,
            meal_id: row.get(1)?,
            name: row.get(2)?,
            brand: row.get(3)?,
            image_url: row.get(4)?,
            nutriscore: row.get(5)?,
            calories: row.get(6)?,
            proteins: row.get(7)?,
            carbs: row.get(8)?,
            fats: row.get(9)?,
        })
    }

    // --- Meals ---

    /// Write a meal and its complete food set in one transaction.
    ///
    /// The meal row is upserted by id, any foods previously stored under that
    /// id are removed, and the new foods are inserted with macros coerced to
    /// finite numbers. If any step fails the transaction rolls back, so the
    /// database never holds a meal with a partial food set.
    pub fn save_meal(&mut self, input: &NewMeal) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO meals (id, name, date) VALUES (?1, ?2, ?3)",
            params![input.id, input.name, input.date],
        )?;
        tx.execute("DELETE FROM foods WHERE meal_id = ?1", params![input.id])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO foods
                    (id, meal_id, name, brand, image_url, nutriscore,
                     calories, proteins, carbs, fats)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for food in &input.foods {
                stmt.execute(params![
                    food.id,
                    input.id,
                    food.name,
                    food.brand,
                    food.image_url,
                    food.nutriscore,
                    coerce_macro(food.calories),
                    coerce_macro(food.proteins),
                    coerce_macro(food.carbs),
                    coerce_macro(food.fats),
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// All meals with their summed food calories, most recent first.
    pub fn list_meals(&self) -> Result<Vec<MealSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.name, m.date, COALESCE(SUM(f.calories), 0) AS total_calories
             FROM meals m
             LEFT JOIN foods f ON f.meal_id = m.id
             GROUP BY m.id
             ORDER BY m.date DESC",
        )?;
        let meals = stmt
            .query_map([], |row| {
                Ok(MealSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    date: row.get(2)?,
                    total_calories: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }

    /// A meal and its foods (ordered by food name), or `None` if the id is unknown.
    pub fn get_meal_with_foods(&self, meal_id: &str) -> Result<Option<MealWithFoods>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, date FROM meals WHERE id = ?1")?;
        let mut rows = stmt.query(params![meal_id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let id: String = row.get(0)?;
        let name: String = row.get(1)?;
        let date: String = row.get(2)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, meal_id, name, brand, image_url, nutriscore,
                    calories, proteins, carbs, fats
             FROM foods
             WHERE meal_id = ?1
             ORDER BY name ASC",
        )?;
        let foods = stmt
            .query_map(params![meal_id], Self::food_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(MealWithFoods {
            id,
            name,
            date,
            foods,
        }))
    }

    /// Delete a meal; the foreign-key cascade removes its foods.
    /// Returns false when no meal with that id existed.
    pub fn delete_meal(&self, meal_id: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM meals WHERE id = ?1", params![meal_id])?;
        Ok(rows > 0)
    }

    // --- Settings ---

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM settings WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }
}
