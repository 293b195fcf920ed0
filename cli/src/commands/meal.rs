use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutritrack_core::models::day_key;
use nutritrack_core::service::MealStore;

use super::helpers::{json_error, truncate};

pub(crate) fn cmd_meals(store: &MealStore, json: bool) -> Result<()> {
    let meals = store.get_meals()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
        return Ok(());
    }

    if meals.is_empty() {
        eprintln!("No meals logged yet. Use `nutritrack log` to add one.");
        process::exit(2);
    }

    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Meal")]
        name: String,
        #[tabled(rename = "Kcal")]
        calories: String,
        #[tabled(rename = "ID")]
        id: String,
    }

    let rows: Vec<MealRow> = meals
        .iter()
        .map(|m| MealRow {
            date: day_key(&m.date).unwrap_or_else(|| m.date.clone()),
            name: truncate(&m.name, 25),
            calories: format!("{:.0}", m.total_calories),
            id: m.id.clone(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(2)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}

pub(crate) fn cmd_show(store: &MealStore, meal_id: &str, json: bool) -> Result<()> {
    let Some(meal) = store.get_meal_by_id(meal_id)? else {
        if json {
            println!("{}", json_error(&format!("Meal {meal_id} not found")));
        } else {
            eprintln!("Meal {meal_id} not found");
        }
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
        return Ok(());
    }

    let name = &meal.name;
    let date = day_key(&meal.date).unwrap_or_else(|| meal.date.clone());
    let count = meal.foods.len();
    println!("=== {name} — {date} ({count} food(s)) ===\n");

    let mut total_calories = 0.0;
    let mut total_proteins = 0.0;
    let mut total_carbs = 0.0;
    let mut total_fats = 0.0;

    for food in &meal.foods {
        let food_name = &food.name;
        let brand = food
            .brand
            .as_ref()
            .map(|b| format!(" ({b})"))
            .unwrap_or_default();
        let score = food
            .nutriscore
            .as_ref()
            .map(|s| format!(" [Nutri-Score {}]", s.to_uppercase()))
            .unwrap_or_default();
        let cal = food.calories;
        let proteins = food.proteins;
        let carbs = food.carbs;
        let fats = food.fats;
        println!(
            "  {food_name}{brand} — {cal:.0} kcal | P:{proteins:.0}g C:{carbs:.0}g F:{fats:.0}g{score}"
        );

        total_calories += food.calories;
        total_proteins += food.proteins;
        total_carbs += food.carbs;
        total_fats += food.fats;
    }

    println!(
        "\n  TOTAL: {total_calories:.0} kcal | P:{total_proteins:.0}g C:{total_carbs:.0}g F:{total_fats:.0}g"
    );

    Ok(())
}

pub(crate) fn cmd_delete(store: &MealStore, meal_id: &str, json: bool) -> Result<()> {
    if store.delete_meal(meal_id)? {
        if json {
            println!("{}", serde_json::json!({ "deleted": meal_id }));
        } else {
            println!("Deleted meal {meal_id}");
        }
        Ok(())
    } else {
        if json {
            println!("{}", json_error(&format!("Meal {meal_id} not found")));
        } else {
            eprintln!("Meal {meal_id} not found");
        }
        process::exit(2);
    }
}
