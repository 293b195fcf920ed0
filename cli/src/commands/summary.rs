use anyhow::Result;
use std::process;

use nutritrack_core::models::{DEFAULT_DAILY_GOAL, MealSummary, day_key};
use nutritrack_core::service::MealStore;

use super::helpers::parse_date;

pub(crate) fn cmd_summary(store: &MealStore, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let day = date.format("%Y-%m-%d").to_string();

    let meals: Vec<MealSummary> = store
        .get_meals()?
        .into_iter()
        .filter(|m| day_key(&m.date).as_deref() == Some(day.as_str()))
        .collect();

    let consumed: f64 = meals.iter().map(|m| m.total_calories).sum();
    let goal = store.get_daily_goal(DEFAULT_DAILY_GOAL)?;
    let remaining = goal - consumed;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "date": day,
                "meals": meals,
                "consumed_calories": consumed,
                "goal_calories": goal,
                "remaining_calories": remaining,
            }))?
        );
        return Ok(());
    }

    if meals.is_empty() {
        eprintln!("No meals for {day}");
        process::exit(2);
    }

    println!("=== {day} ===\n");
    for meal in &meals {
        let name = &meal.name;
        let cal = meal.total_calories;
        println!("  {name}: {cal:.0} kcal");
    }

    println!("\n  TOTAL: {consumed:.0} kcal");
    println!("  GOAL: {goal:.0} kcal");
    println!("  REMAINING: {remaining:.0} kcal");

    Ok(())
}
