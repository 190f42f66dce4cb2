use std::sync::Arc;

use plateplan_catalog::CandidateRecipe;
use rand::{Rng, seq::SliceRandom};
use strum::VariantArray;

use crate::MealType;

pub const BUCKET_FLOOR: usize = 3;
/// Upper bound (inclusive) for breakfast/snack by preparation time.
pub const QUICK_MINUTES: u32 = 15;
/// Upper bound (inclusive) for lunch by preparation time.
pub const MEDIUM_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy)]
pub struct TagRule {
    pub meal_type: MealType,
    pub keywords: &'static [&'static str],
}

impl TagRule {
    pub fn matches(&self, dish_types: &[String]) -> bool {
        dish_types.iter().any(|tag| {
            let tag = tag.to_lowercase();
            self.keywords.iter().any(|keyword| tag.contains(keyword))
        })
    }
}

/// Evaluated top to bottom, first match wins. Lunch precedes dinner, so
/// generic main-course tags land in lunch and dinner only gets explicit
/// dinner tags until buckets are rebalanced.
pub const TAG_RULES: [TagRule; 4] = [
    TagRule {
        meal_type: MealType::Breakfast,
        keywords: &["breakfast", "morning meal", "brunch"],
    },
    TagRule {
        meal_type: MealType::Lunch,
        keywords: &["lunch", "main course", "main dish"],
    },
    TagRule {
        meal_type: MealType::Dinner,
        keywords: &["dinner", "main course", "main dish"],
    },
    TagRule {
        meal_type: MealType::Snack,
        keywords: &["snack", "appetizer", "side dish", "dessert", "fingerfood"],
    },
];

pub fn tag_meal_type(dish_types: &[String]) -> Option<MealType> {
    TAG_RULES
        .iter()
        .find(|rule| rule.matches(dish_types))
        .map(|rule| rule.meal_type)
}

/// Recipes partitioned by meal type. A recipe sits in at most one bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets([Vec<Arc<CandidateRecipe>>; 4]);

impl Buckets {
    pub fn get(&self, meal_type: MealType) -> &[Arc<CandidateRecipe>] {
        &self.0[meal_type.index()]
    }

    pub fn len(&self, meal_type: MealType) -> usize {
        self.0[meal_type.index()].len()
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    pub fn push(&mut self, meal_type: MealType, recipe: Arc<CandidateRecipe>) {
        self.0[meal_type.index()].push(recipe);
    }

    /// Bucket holding `id`, if any.
    pub fn find(&self, id: u64) -> Option<MealType> {
        MealType::VARIANTS
            .iter()
            .copied()
            .find(|meal_type| self.get(*meal_type).iter().any(|r| r.id == id))
    }

    /// Same buckets with `id` dropped everywhere.
    pub fn without(mut self, id: u64) -> Self {
        for bucket in self.0.iter_mut() {
            bucket.retain(|recipe| recipe.id != id);
        }
        self
    }

    fn take_random<R: Rng>(&mut self, meal_type: MealType, rng: &mut R) -> Option<Arc<CandidateRecipe>> {
        let bucket = &mut self.0[meal_type.index()];
        if bucket.is_empty() {
            return None;
        }

        let index = rng.random_range(0..bucket.len());
        Some(bucket.remove(index))
    }
}

fn time_meal_type(minutes: u32, buckets: &Buckets) -> MealType {
    match minutes {
        0..=QUICK_MINUTES => {
            if buckets.len(MealType::Snack) < buckets.len(MealType::Breakfast) {
                MealType::Snack
            } else {
                MealType::Breakfast
            }
        }
        m if m <= MEDIUM_MINUTES => MealType::Lunch,
        _ => MealType::Dinner,
    }
}

fn enforce_floor<R: Rng>(buckets: &mut Buckets, floor: usize, rng: &mut R) {
    for meal_type in MealType::VARIANTS.iter().copied() {
        while buckets.len(meal_type) < floor {
            let donor = MealType::VARIANTS
                .iter()
                .copied()
                .filter(|donor| *donor != meal_type && buckets.len(*donor) > floor)
                .max_by_key(|donor| buckets.len(*donor));

            let Some(recipe) = donor.and_then(|donor| buckets.take_random(donor, rng)) else {
                break;
            };

            buckets.push(meal_type, recipe);
        }
    }
}

fn fill_empty(buckets: &mut Buckets, leftovers: &[Arc<CandidateRecipe>]) {
    let empty = MealType::VARIANTS
        .iter()
        .copied()
        .filter(|meal_type| buckets.len(*meal_type) == 0)
        .collect::<Vec<_>>();

    if empty.is_empty() || leftovers.is_empty() {
        return;
    }

    // Near-equal contiguous shares; the first `extra` buckets take one more.
    let base = leftovers.len() / empty.len();
    let extra = leftovers.len() % empty.len();
    let mut rest = leftovers;

    for (position, meal_type) in empty.into_iter().enumerate() {
        let take = (base + usize::from(position < extra)).min(rest.len());
        let (share, tail) = rest.split_at(take);
        for recipe in share {
            buckets.push(meal_type, recipe.clone());
        }
        rest = tail;
    }
}

/// Partitions the filtered pool into breakfast, lunch, dinner and snack
/// buckets.
///
/// 1. shuffled recipes go through [`TAG_RULES`];
/// 2. untagged recipes with a known ready time are placed by duration;
/// 3. buckets under `floor` borrow random recipes from the largest bucket
///    still above it;
/// 4. buckets that are still empty share the recipes nothing could place.
pub fn classify<R: Rng>(
    recipes: &[Arc<CandidateRecipe>],
    floor: usize,
    rng: &mut R,
) -> Buckets {
    let mut shuffled = recipes.to_vec();
    shuffled.shuffle(rng);

    let mut buckets = Buckets::default();
    let mut untagged = vec![];

    for recipe in shuffled {
        match tag_meal_type(&recipe.dish_types) {
            Some(meal_type) => buckets.push(meal_type, recipe),
            None => untagged.push(recipe),
        }
    }

    let mut leftovers = vec![];
    for recipe in untagged {
        match recipe.ready_in_minutes {
            Some(minutes) => {
                let meal_type = time_meal_type(minutes, &buckets);
                buckets.push(meal_type, recipe);
            }
            None => leftovers.push(recipe),
        }
    }

    enforce_floor(&mut buckets, floor, rng);
    fill_empty(&mut buckets, &leftovers);

    tracing::debug!(
        breakfast = buckets.len(MealType::Breakfast),
        lunch = buckets.len(MealType::Lunch),
        dinner = buckets.len(MealType::Dinner),
        snack = buckets.len(MealType::Snack),
        unplaced = recipes.len().saturating_sub(buckets.total()),
        "classified candidate pool"
    );

    buckets
}
