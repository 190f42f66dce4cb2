use std::sync::Arc;

use plateplan_catalog::CandidateRecipe;
use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::Constraints;

/// Time ceiling multiplier applied once the diet filter has been dropped.
pub const RELAXED_TIME_FACTOR: f64 = 1.5;

/// Alias → canonical diet label. Lookup happens after lowercasing and
/// turning hyphens/underscores into spaces.
const DIET_SYNONYMS: &[(&str, &str)] = &[
    ("glutenfree", "gluten free"),
    ("gf", "gluten free"),
    ("dairyfree", "dairy free"),
    ("veggie", "vegetarian"),
    ("plant based", "vegan"),
    ("keto", "ketogenic"),
    ("paleo", "paleolithic"),
    ("pescatarian", "pescetarian"),
    ("whole30", "whole 30"),
    ("low fodmap", "fodmap friendly"),
];

/// Relaxation step that produced the filtered pool.
#[derive(Display, AsRefStr, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FilterTier {
    /// Diet and time ceiling both enforced.
    Strict,
    /// Diet ignored, time ceiling stretched by [`RELAXED_TIME_FACTOR`].
    Relaxed,
    /// Raw candidate list.
    Unfiltered,
}

#[derive(Debug, Clone)]
pub struct FilteredPool {
    pub recipes: Vec<Arc<CandidateRecipe>>,
    pub tier: FilterTier,
}

/// Normalizes a user-supplied diet label through the synonym table.
///
/// ```
/// use plateplan_mealplan::filter::normalize_diet;
///
/// assert_eq!(normalize_diet("Gluten-Free"), "gluten free");
/// assert_eq!(normalize_diet("keto"), "ketogenic");
/// assert_eq!(normalize_diet("whole 30"), "whole 30");
/// ```
pub fn normalize_diet(label: &str) -> String {
    let spaced = label.trim().to_lowercase().replace(['-', '_'], " ");
    let spaced = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    DIET_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == spaced)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(spaced)
}

fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '_'))
        .collect()
}

/// Compare one declared tag to a normalized diet label.
///
/// Only "vegetarian" knows about a sub-diet ("vegan"); other hierarchies such
/// as pescetarian/vegetarian are not modelled.
fn tag_matches(tag: &str, diet: &str) -> bool {
    let tag = tag.trim().to_lowercase();

    match diet {
        "vegetarian" => tag.contains("vegetarian") || tag == "vegan",
        "vegan" => tag == "vegan",
        "gluten free" => tag == "gluten free" || tag == "gluten-free",
        _ => {
            let tag = compact(&tag);
            let diet = compact(diet);
            !tag.is_empty() && !diet.is_empty() && (tag.contains(&diet) || diet.contains(&tag))
        }
    }
}

/// A recipe without any declared diet tag is never rejected here.
pub fn matches_diet(recipe: &CandidateRecipe, diet: &str) -> bool {
    recipe.diets.is_empty() || recipe.diets.iter().any(|tag| tag_matches(tag, diet))
}

/// Unknown ready time passes; equal to the ceiling passes.
pub fn fits_time(recipe: &CandidateRecipe, ceiling: Option<f64>) -> bool {
    match (ceiling, recipe.ready_in_minutes) {
        (Some(ceiling), Some(ready)) => f64::from(ready) <= ceiling,
        _ => true,
    }
}

fn apply(
    recipes: &[Arc<CandidateRecipe>],
    diet: Option<&str>,
    ceiling: Option<f64>,
) -> Vec<Arc<CandidateRecipe>> {
    recipes
        .iter()
        .filter(|recipe| diet.is_none_or(|diet| matches_diet(recipe, diet)))
        .filter(|recipe| fits_time(recipe, ceiling))
        .cloned()
        .collect()
}

/// Narrows the raw pool to recipes compatible with the hard constraints.
///
/// When fewer than `meal_count` recipes survive, the diet is dropped and the
/// time ceiling stretched; if that is still short the raw pool is returned.
pub fn filter_candidates(
    recipes: &[Arc<CandidateRecipe>],
    constraints: &Constraints,
) -> FilteredPool {
    let needed = usize::from(constraints.meal_count);
    let diet = constraints.diet.as_deref().map(normalize_diet);
    let ceiling = constraints.max_prep_minutes.map(f64::from);

    let strict = apply(recipes, diet.as_deref(), ceiling);
    if strict.len() >= needed {
        return FilteredPool {
            recipes: strict,
            tier: FilterTier::Strict,
        };
    }

    tracing::warn!(
        diet = diet.as_deref().unwrap_or("none"),
        kept = strict.len(),
        needed,
        "too few recipes satisfy diet and time limit, ignoring diet"
    );

    let relaxed = apply(recipes, None, ceiling.map(|c| c * RELAXED_TIME_FACTOR));
    if relaxed.len() >= needed {
        return FilteredPool {
            recipes: relaxed,
            tier: FilterTier::Relaxed,
        };
    }

    tracing::warn!(
        kept = relaxed.len(),
        needed,
        total = recipes.len(),
        "too few recipes after relaxing constraints, using unfiltered pool"
    );

    FilteredPool {
        recipes: recipes.to_vec(),
        tier: FilterTier::Unfiltered,
    }
}
