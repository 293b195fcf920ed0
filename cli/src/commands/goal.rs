use anyhow::{Result, bail};

use nutritrack_core::models::DEFAULT_DAILY_GOAL;
use nutritrack_core::service::MealStore;

pub(crate) fn cmd_goal_set(store: &MealStore, calories: f64, json: bool) -> Result<()> {
    // The store accepts whatever it is given; rejecting bad goals is on us.
    if !calories.is_finite() || calories <= 0.0 {
        bail!("Daily goal must be a number greater than 0");
    }

    store.set_daily_goal(calories)?;

    if json {
        println!("{}", serde_json::json!({ "goal_calories": calories }));
    } else {
        println!("Daily goal set to {calories:.0} kcal");
    }
    Ok(())
}

pub(crate) fn cmd_goal_show(store: &MealStore, json: bool) -> Result<()> {
    let goal = store.get_daily_goal(DEFAULT_DAILY_GOAL)?;

    if json {
        println!("{}", serde_json::json!({ "goal_calories": goal }));
    } else {
        println!("Daily goal: {goal:.0} kcal");
    }
    Ok(())
}
