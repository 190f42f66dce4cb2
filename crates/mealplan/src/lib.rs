pub mod acquire;
pub mod assign;
pub mod classify;
mod error;
pub mod filter;
pub mod nutrition;
pub mod plan;
mod planner;
mod types;

pub use error::*;
pub use filter::FilterTier;
pub use nutrition::NutritionTotals;
pub use plan::{DayPlan, MealPlan, PlanPreferences, PlanRequest, PlannedMeal};
pub use planner::*;
pub use types::*;
