use anyhow::{Context, Result};
use std::process;
use uuid::Uuid;

use nutritrack_core::models::{NewFood, NewMeal, coerce_macro, day_key, validate_meal_type};
use nutritrack_core::service::MealStore;

use super::helpers::{food_key, json_error, meal_timestamp, parse_date, parse_nutriscore};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_log(
    store: &MealStore,
    name: &str,
    brand: Option<String>,
    image_url: Option<String>,
    nutriscore: Option<String>,
    calories: Option<f64>,
    proteins: Option<f64>,
    carbs: Option<f64>,
    fats: Option<f64>,
    meal: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let meal_type = validate_meal_type(meal)?;
    let nutriscore = nutriscore.map(|g| parse_nutriscore(&g)).transpose()?;
    let date = parse_date(date)?;
    let day = date.format("%Y-%m-%d").to_string();

    let new_food = NewFood {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        brand,
        image_url,
        nutriscore,
        calories,
        proteins,
        carbs,
        fats,
    };

    // A meal of the same type already logged that day is appended to,
    // keeping its id and timestamp, rather than logged as a duplicate meal.
    let existing = store
        .get_meals()?
        .into_iter()
        .find(|m| m.name == meal_type && day_key(&m.date).as_deref() == Some(day.as_str()));

    let (meal_id, meal_date, mut foods) = match existing {
        Some(summary) => {
            let detail = store
                .get_meal_by_id(&summary.id)?
                .with_context(|| format!("Meal {} not found", summary.id))?;
            let foods: Vec<NewFood> = detail.foods.into_iter().map(NewFood::from).collect();
            (summary.id, summary.date, foods)
        }
        None => (Uuid::new_v4().to_string(), meal_timestamp(date)?, Vec::new()),
    };

    let key = food_key(&new_food.name, new_food.brand.as_deref());
    if foods
        .iter()
        .any(|f| food_key(&f.name, f.brand.as_deref()) == key)
    {
        if json {
            println!(
                "{}",
                json_error(&format!("'{name}' is already in {meal_type} on {day}"))
            );
        } else {
            eprintln!("'{name}' is already in {meal_type} on {day}");
        }
        process::exit(2);
    }
    foods.push(new_food);

    let total: f64 = foods.iter().map(|f| coerce_macro(f.calories)).sum();
    store.save_meal(&NewMeal {
        id: meal_id.clone(),
        name: meal_type.clone(),
        date: meal_date,
        foods,
    })?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "meal_id": meal_id,
                "meal": meal_type,
                "food": name,
                "total_calories": total,
            })
        );
    } else {
        let cal = coerce_macro(calories);
        println!("Logged: {name} for {meal_type} — {cal:.0} kcal (meal total {total:.0} kcal)");
    }

    Ok(())
}
