use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::assign::DayAssignment;
use crate::filter::FilterTier;
use crate::nutrition::NutritionTotals;
use crate::{
    Constraints, DEFAULT_DAILY_CALORIES, DEFAULT_MEAL_COUNT, MAX_MEAL_COUNT, MealPlanError,
    MealType, SelectedMeal, TimeFrame,
};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanPreferences {
    #[serde(default)]
    pub meal_count: Option<u8>,
    #[serde(default)]
    pub ready_time: Option<u32>,
    #[serde(default)]
    pub cuisines: Vec<String>,
}

/// Inbound meal plan request.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub time_frame: TimeFrame,
    #[serde(default)]
    pub target_calories: Option<u32>,
    #[serde(default)]
    pub diet: Option<String>,
    /// Comma separated string or list of terms.
    #[serde(default, deserialize_with = "deserialize_terms")]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub preferences: PlanPreferences,
    /// `YYYY-MM-DD`; today when absent.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Validated request, ready for the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInput {
    pub constraints: Constraints,
    pub start: Date,
    pub seed: Option<u64>,
}

pub fn split_terms(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
        .collect()
}

fn deserialize_terms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Terms {
        Csv(String),
        List(Vec<String>),
    }

    Ok(match Option::<Terms>::deserialize(deserializer)? {
        None => vec![],
        Some(Terms::Csv(value)) => split_terms(&value),
        Some(Terms::List(values)) => values.iter().flat_map(|v| split_terms(v)).collect(),
    })
}

pub fn parse_date(value: &str) -> Result<Date, MealPlanError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| MealPlanError::InvalidRequest(format!("invalid date '{value}': {e}")))
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Today's date in the local timezone, UTC when the offset cannot be determined.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

impl PlanRequest {
    pub fn validate(self, today: Date) -> Result<PlanInput, MealPlanError> {
        let meal_count = self.preferences.meal_count.unwrap_or(DEFAULT_MEAL_COUNT);
        if !(1..=MAX_MEAL_COUNT).contains(&meal_count) {
            return Err(MealPlanError::InvalidRequest(format!(
                "meal count must be between 1 and {MAX_MEAL_COUNT}, got {meal_count}"
            )));
        }

        let daily_calories = self.target_calories.unwrap_or(DEFAULT_DAILY_CALORIES);
        if daily_calories == 0 {
            return Err(MealPlanError::InvalidRequest(
                "target calories must be greater than 0".to_owned(),
            ));
        }

        let start = match self.date.as_deref() {
            Some(value) => parse_date(value)?,
            None => today,
        };

        let diet = self
            .diet
            .map(|diet| diet.trim().to_owned())
            .filter(|diet| !diet.is_empty());

        Ok(PlanInput {
            constraints: Constraints {
                diet,
                exclude: self.exclude,
                cuisines: self.preferences.cuisines,
                max_prep_minutes: self.preferences.ready_time,
                daily_calories,
                meal_count,
                time_frame: self.time_frame,
            },
            start,
            seed: self.seed,
        })
    }
}

fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    pub meal_type: MealType,
    pub recipe_id: u64,
    pub title: String,
}

impl From<&SelectedMeal> for PlannedMeal {
    fn from(value: &SelectedMeal) -> Self {
        Self {
            meal_type: value.meal_type,
            recipe_id: value.recipe.id,
            title: value.recipe.title.to_owned(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    pub meals: Vec<PlannedMeal>,
    pub nutrition: NutritionTotals,
}

/// Outbound plan: one entry per day plus plan-wide nutrition.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub days: Vec<DayPlan>,
    pub nutrition: NutritionTotals,
    pub skipped_slots: usize,
    pub filter_tier: FilterTier,
    /// Assignments in plan order.
    #[serde(skip)]
    pub selections: Vec<SelectedMeal>,
}

impl MealPlan {
    pub fn new(assignments: Vec<DayAssignment>, filter_tier: FilterTier) -> Self {
        let mut nutrition = NutritionTotals::default();
        let mut skipped_slots = 0;
        let mut days = Vec::with_capacity(assignments.len());
        let mut selections = vec![];

        for day in assignments {
            nutrition += day.totals;
            skipped_slots += day.skipped;
            days.push(DayPlan {
                date: day.date,
                meals: day.meals.iter().map(PlannedMeal::from).collect(),
                nutrition: day.totals,
            });
            selections.extend(day.meals);
        }

        Self {
            days,
            nutrition,
            skipped_slots,
            filter_tier,
            selections,
        }
    }
}
