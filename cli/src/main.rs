mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_delete, cmd_goal_set, cmd_goal_show, cmd_log, cmd_meals, cmd_show, cmd_summary,
};
use crate::config::Config;
use nutritrack_core::service::MealStore;

#[derive(Parser)]
#[command(
    name = "nutritrack",
    version,
    about = "A simple nutrition tracker CLI",
    long_about = "\n\n  ███╗   ██╗██╗   ██╗████████╗██████╗ ██╗
  ████╗  ██║██║   ██║╚══██╔══╝██╔══██╗██║
  ██╔██╗ ██║██║   ██║   ██║   ██████╔╝██║
  ██║╚██╗██║██║   ██║   ██║   ██╔══██╗██║
  ██║ ╚████║╚██████╔╝   ██║   ██║  ██║██║
  ╚═╝  ╚═══╝ ╚═════╝    ╚═╝   ╚═╝  ╚═╝╚═╝
        track what you're eating.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a food into a meal (appends to an existing meal of the same type that day)
    Log {
        /// Food name
        food: String,
        /// Calories (kcal)
        #[arg(long)]
        calories: Option<f64>,
        /// Proteins in grams
        #[arg(long)]
        proteins: Option<f64>,
        /// Carbohydrates in grams
        #[arg(long)]
        carbs: Option<f64>,
        /// Fats in grams
        #[arg(long)]
        fats: Option<f64>,
        /// Brand name
        #[arg(long)]
        brand: Option<String>,
        /// Nutri-Score grade (A-E)
        #[arg(long)]
        nutriscore: Option<String>,
        /// Product image URL
        #[arg(long)]
        image_url: Option<String>,
        /// Meal type: petit-dejeuner, dejeuner, diner, snack
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all meals with their calorie totals
    Meals {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one meal and its foods
    Show {
        /// Meal ID
        meal_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a meal and all its foods
    Delete {
        /// Meal ID
        meal_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a day's intake against the daily goal (defaults to today)
    Summary {
        /// Date to show (YYYY-MM-DD or today/yesterday, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the daily calorie goal
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set the daily calorie goal
    Set {
        /// Daily goal in kcal
        calories: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current daily calorie goal
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = MealStore::open(&config.db_path)?;

    match cli.command {
        Commands::Log {
            food,
            calories,
            proteins,
            carbs,
            fats,
            brand,
            nutriscore,
            image_url,
            meal,
            date,
            json,
        } => cmd_log(
            &store, &food, brand, image_url, nutriscore, calories, proteins, carbs, fats, &meal,
            date, json,
        ),
        Commands::Meals { json } => cmd_meals(&store, json),
        Commands::Show { meal_id, json } => cmd_show(&store, &meal_id, json),
        Commands::Delete { meal_id, json } => cmd_delete(&store, &meal_id, json),
        Commands::Summary { date, json } => cmd_summary(&store, date, json),
        Commands::Goal { command } => match command {
            GoalCommands::Set { calories, json } => cmd_goal_set(&store, calories, json),
            GoalCommands::Show { json } => cmd_goal_show(&store, json),
        },
    }
}
