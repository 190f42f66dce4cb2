use std::sync::Arc;

use plateplan_catalog::CandidateRecipe;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::Date;

pub const DEFAULT_DAILY_CALORIES: u32 = 2000;
pub const DEFAULT_MEAL_COUNT: u8 = 3;
pub const MAX_MEAL_COUNT: u8 = 6;

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn index(self) -> usize {
        match self {
            MealType::Breakfast => 0,
            MealType::Lunch => 1,
            MealType::Dinner => 2,
            MealType::Snack => 3,
        }
    }

    /// Fallback energy when a recipe has no calorie data, in kcal.
    pub fn default_calories(self) -> f64 {
        match self {
            MealType::Breakfast => 400.0,
            MealType::Lunch => 600.0,
            MealType::Dinner => 700.0,
            MealType::Snack => 200.0,
        }
    }
}

#[derive(
    EnumString, Display, AsRefStr, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    Day,
    Week,
}

impl TimeFrame {
    pub fn days(self) -> u32 {
        match self {
            TimeFrame::Day => 1,
            TimeFrame::Week => 7,
        }
    }
}

/// Hard and soft constraints for one planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    pub diet: Option<String>,
    /// Allergy and exclusion terms, forwarded to the catalog.
    pub exclude: Vec<String>,
    pub cuisines: Vec<String>,
    pub max_prep_minutes: Option<u32>,
    pub daily_calories: u32,
    pub meal_count: u8,
    pub time_frame: TimeFrame,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            diet: None,
            exclude: vec![],
            cuisines: vec![],
            max_prep_minutes: None,
            daily_calories: DEFAULT_DAILY_CALORIES,
            meal_count: DEFAULT_MEAL_COUNT,
            time_frame: TimeFrame::Day,
        }
    }
}

impl Constraints {
    pub fn days(&self) -> u32 {
        self.time_frame.days()
    }

    /// Calorie target for a single slot; snacks get half a regular share.
    pub fn slot_calories(&self, meal_type: MealType) -> f64 {
        let share = f64::from(self.daily_calories) / f64::from(self.meal_count.max(1));

        match meal_type {
            MealType::Snack => share / 2.0,
            _ => share,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedMeal {
    pub date: Date,
    pub meal_type: MealType,
    pub recipe: Arc<CandidateRecipe>,
}
