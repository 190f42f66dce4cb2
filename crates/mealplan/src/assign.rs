use std::collections::HashSet;
use std::sync::Arc;

use plateplan_catalog::CandidateRecipe;
use rand::Rng;
use time::{Date, Duration};

use crate::classify::Buckets;
use crate::nutrition::{NutritionTotals, recipe_calories};
use crate::{Constraints, MAX_MEAL_COUNT, MealType, SelectedMeal};

/// Default upper bound of the random score perturbation.
pub const JITTER: f64 = 0.2;

const MAIN_SLOTS: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

/// Everything the assignor mutates while walking the plan, passed by value
/// from slot to slot.
#[derive(Debug, Clone, Default)]
pub struct PlanningState {
    pub buckets: Buckets,
    pub used: HashSet<u64>,
    pub day_totals: NutritionTotals,
}

impl PlanningState {
    pub fn new(buckets: Buckets) -> Self {
        Self {
            buckets,
            ..Default::default()
        }
    }

    pub fn start_day(self) -> Self {
        Self {
            day_totals: NutritionTotals::default(),
            ..self
        }
    }

    /// Marks `recipe` as used for the rest of the plan.
    pub fn select(mut self, recipe: &CandidateRecipe) -> Self {
        self.used.insert(recipe.id);

        Self {
            buckets: self.buckets.without(recipe.id),
            day_totals: self.day_totals.with_recipe(recipe),
            used: self.used,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayAssignment {
    pub date: Date,
    pub meals: Vec<SelectedMeal>,
    pub totals: NutritionTotals,
    pub skipped: usize,
}

/// Slots for one day: breakfast, lunch, dinner, then snacks.
///
/// ```
/// use plateplan_mealplan::{MealType, assign::slot_sequence};
///
/// assert_eq!(
///     slot_sequence(5),
///     vec![
///         MealType::Breakfast,
///         MealType::Lunch,
///         MealType::Dinner,
///         MealType::Snack,
///         MealType::Snack,
///     ]
/// );
/// ```
pub fn slot_sequence(meal_count: u8) -> Vec<MealType> {
    let count = usize::from(meal_count.clamp(1, MAX_MEAL_COUNT));

    MAIN_SLOTS
        .iter()
        .copied()
        .chain(std::iter::repeat(MealType::Snack))
        .take(count)
        .collect()
}

/// 1.0 on target, falling linearly to 0.0 at a 100% deviation.
pub fn calorie_closeness(calories: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }

    1.0 - ((calories - target).abs() / target).min(1.0)
}

pub fn score_candidate(recipe: &CandidateRecipe, target: f64, jitter: f64) -> f64 {
    calorie_closeness(recipe_calories(recipe), target) + jitter
}

fn sample_jitter<R: Rng>(rng: &mut R, amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        rng.random_range(0.0..amplitude)
    } else {
        0.0
    }
}

/// Fills one slot from the meal type's bucket, or from the whole filtered
/// pool once that bucket is empty. Recipes already used anywhere in the plan
/// are never candidates; `None` means the slot has to be skipped.
pub fn assign_slot<R: Rng>(
    state: PlanningState,
    pool: &[Arc<CandidateRecipe>],
    meal_type: MealType,
    target: f64,
    jitter: f64,
    rng: &mut R,
) -> (PlanningState, Option<Arc<CandidateRecipe>>) {
    let unused = |recipe: &&Arc<CandidateRecipe>| !state.used.contains(&recipe.id);

    let mut candidates = state.buckets.get(meal_type).iter().filter(unused).peekable();
    let candidates: Vec<&Arc<CandidateRecipe>> = if candidates.peek().is_some() {
        candidates.collect()
    } else {
        pool.iter().filter(unused).collect()
    };

    let best = candidates
        .into_iter()
        .map(|recipe| {
            let score = score_candidate(recipe, target, sample_jitter(rng, jitter));
            (score, recipe)
        })
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(score, recipe)| {
            tracing::debug!(%meal_type, recipe_id = recipe.id, score, target, "slot filled");
            recipe.clone()
        });

    match best {
        Some(recipe) => (state.select(&recipe), Some(recipe)),
        None => (state, None),
    }
}

/// Walks every day of the plan and every slot of each day.
pub fn assign_days<R: Rng>(
    mut state: PlanningState,
    pool: &[Arc<CandidateRecipe>],
    constraints: &Constraints,
    start: Date,
    jitter: f64,
    rng: &mut R,
) -> Vec<DayAssignment> {
    let slots = slot_sequence(constraints.meal_count);
    let mut days = Vec::with_capacity(constraints.days() as usize);

    for day_index in 0..constraints.days() {
        let Some(date) = start.checked_add(Duration::days(i64::from(day_index))) else {
            tracing::warn!(%start, day_index, "plan date out of range, stopping");
            break;
        };

        state = state.start_day();
        let mut meals = Vec::with_capacity(slots.len());
        let mut skipped = 0;

        for meal_type in slots.iter().copied() {
            let target = constraints.slot_calories(meal_type);
            let (next, picked) = assign_slot(state, pool, meal_type, target, jitter, rng);
            state = next;

            match picked {
                Some(recipe) => meals.push(SelectedMeal {
                    date,
                    meal_type,
                    recipe,
                }),
                None => {
                    skipped += 1;
                    tracing::warn!(%date, %meal_type, "no unused recipe left for slot, skipping");
                }
            }
        }

        days.push(DayAssignment {
            date,
            meals,
            totals: state.day_totals,
            skipped,
        });
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateplan_catalog::{Nutrient, Nutrition};
    use rand::{SeedableRng, rngs::StdRng};
    use time::macros::date;

    fn create_test_recipe(id: u64, calories: f64, dish_type: &str) -> Arc<CandidateRecipe> {
        Arc::new(CandidateRecipe {
            id,
            title: format!("Recipe {}", id),
            ready_in_minutes: Some(20),
            nutrition: Some(Nutrition {
                nutrients: vec![Nutrient::new("Calories", calories, "kcal")],
            }),
            dish_types: vec![dish_type.to_owned()],
            ..Default::default()
        })
    }

    #[test]
    fn test_slot_sequences() {
        assert_eq!(slot_sequence(1), vec![MealType::Breakfast]);
        assert_eq!(slot_sequence(3).len(), 3);
        assert_eq!(slot_sequence(4)[3], MealType::Snack);
        assert_eq!(
            slot_sequence(6)
                .iter()
                .filter(|m| **m == MealType::Snack)
                .count(),
            3
        );
    }

    #[test]
    fn test_closeness_is_monotonic() {
        let target = 600.0;
        let far = create_test_recipe(1, 800.0, "lunch");
        let near = create_test_recipe(2, 610.0, "lunch");

        assert!(score_candidate(&near, target, 0.0) > score_candidate(&far, target, 0.0));
        assert_eq!(calorie_closeness(600.0, target), 1.0);
        assert_eq!(calorie_closeness(1500.0, target), 0.0);
        assert_eq!(calorie_closeness(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_picks_closest_without_jitter() {
        let mut buckets = Buckets::default();
        buckets.push(MealType::Lunch, create_test_recipe(1, 900.0, "lunch"));
        buckets.push(MealType::Lunch, create_test_recipe(2, 640.0, "lunch"));
        buckets.push(MealType::Lunch, create_test_recipe(3, 300.0, "lunch"));
        let mut rng = StdRng::seed_from_u64(0);

        let (state, picked) =
            assign_slot(PlanningState::new(buckets), &[], MealType::Lunch, 600.0, 0.0, &mut rng);

        assert_eq!(picked.map(|r| r.id), Some(2));
        assert!(state.used.contains(&2));
        assert_eq!(state.buckets.len(MealType::Lunch), 2);
        assert_eq!(state.day_totals.calories, 640.0);
    }

    #[test]
    fn test_empty_bucket_falls_back_to_pool() {
        let pool = vec![
            create_test_recipe(1, 200.0, "snack"),
            create_test_recipe(2, 700.0, "dinner"),
        ];
        let mut state = PlanningState::new(Buckets::default());
        state.used.insert(2);
        let mut rng = StdRng::seed_from_u64(0);

        let (state, picked) = assign_slot(state, &pool, MealType::Dinner, 700.0, JITTER, &mut rng);
        assert_eq!(picked.map(|r| r.id), Some(1));

        let (_, picked) = assign_slot(state, &pool, MealType::Dinner, 700.0, JITTER, &mut rng);
        assert!(picked.is_none());
    }

    #[test]
    fn test_selection_removes_recipe_from_every_bucket() {
        let shared = create_test_recipe(5, 500.0, "lunch");
        let mut buckets = Buckets::default();
        buckets.push(MealType::Lunch, shared.clone());
        buckets.push(MealType::Dinner, create_test_recipe(6, 500.0, "dinner"));

        let state = PlanningState::new(buckets).select(&shared);

        assert_eq!(state.buckets.find(5), None);
        assert_eq!(state.buckets.total(), 1);
    }

    #[test]
    fn test_days_reset_totals_and_never_repeat() {
        let pool = (1..=6)
            .map(|id| create_test_recipe(id, 500.0, "main course"))
            .collect::<Vec<_>>();
        let mut buckets = Buckets::default();
        for recipe in &pool {
            buckets.push(MealType::Lunch, recipe.clone());
        }
        let constraints = Constraints {
            meal_count: 2,
            time_frame: crate::TimeFrame::Week,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);

        let days = assign_days(
            PlanningState::new(buckets),
            &pool,
            &constraints,
            date!(2025 - 06 - 01),
            JITTER,
            &mut rng,
        );

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].totals.calories, 1000.0);
        assert_eq!(days[2].totals.calories, 1000.0);
        assert_eq!(days[3].meals.len(), 0);
        assert_eq!(days[3].skipped, 2);
        assert_eq!(days[3].totals.calories, 0.0);

        let ids = days
            .iter()
            .flat_map(|d| d.meals.iter().map(|m| m.recipe.id))
            .collect::<Vec<_>>();
        let unique = ids.iter().collect::<HashSet<_>>();
        assert_eq!(ids.len(), 6);
        assert_eq!(unique.len(), 6);
    }
}
