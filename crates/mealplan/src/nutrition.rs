use std::ops::{Add, AddAssign};

use plateplan_catalog::{CandidateRecipe, Nutrient};
use serde::Serialize;

use crate::classify::tag_meal_type;

const CALORIE_NAMES: &[&str] = &["calories", "energy"];
const PROTEIN_NAMES: &[&str] = &["protein"];
const CARB_NAMES: &[&str] = &["carbohydrates", "carbs"];
const FAT_NAMES: &[&str] = &["fat"];

/// Running calories/macros, either for a single day or for a whole plan.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionTotals {
    /// Totals after eating `recipe`.
    ///
    /// Without a nutrient list only the calorie estimate is added and the
    /// macros stay untouched.
    pub fn with_recipe(self, recipe: &CandidateRecipe) -> Self {
        let calories = self.calories + recipe_calories(recipe);

        let Some(nutrients) = recipe.nutrients() else {
            return Self { calories, ..self };
        };

        Self {
            calories,
            protein: self.protein + find_amount(nutrients, PROTEIN_NAMES).unwrap_or_default(),
            carbs: self.carbs + find_amount(nutrients, CARB_NAMES).unwrap_or_default(),
            fat: self.fat + find_amount(nutrients, FAT_NAMES).unwrap_or_default(),
        }
    }
}

impl Add for NutritionTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

fn find_amount(nutrients: &[Nutrient], names: &[&str]) -> Option<f64> {
    nutrients
        .iter()
        .find(|n| names.iter().any(|name| n.name.trim().eq_ignore_ascii_case(name)))
        .map(|n| n.amount)
}

/// Calories from the nutrient list, falling back to [`estimate_calories`].
pub fn recipe_calories(recipe: &CandidateRecipe) -> f64 {
    recipe
        .nutrients()
        .and_then(|nutrients| find_amount(nutrients, CALORIE_NAMES))
        .unwrap_or_else(|| estimate_calories(recipe))
}

/// Energy guess for recipes without calorie data: the default for the meal
/// type its dish tags point at, otherwise ten kcal per minute of preparation.
pub fn estimate_calories(recipe: &CandidateRecipe) -> f64 {
    match tag_meal_type(&recipe.dish_types) {
        Some(meal_type) => meal_type.default_calories(),
        None => f64::from(recipe.ready_in_minutes.unwrap_or_default()) * 10.0,
    }
}
