use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use plateplan_catalog::{CandidateRecipe, Catalog, CatalogQuery};

use crate::{Constraints, MealPlanError, TimeFrame};

/// Candidate pool should hold at least `meal_count * MIN_POOL_FACTOR` recipes.
pub const MIN_POOL_FACTOR: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct AcquireSettings {
    /// Requested recipes per meal slot for a one-day plan.
    pub day_multiplier: u32,
    /// Requested recipes per meal slot for a week plan.
    pub week_multiplier: u32,
    /// Largest page size the provider accepts.
    pub max_request_size: u32,
    /// Pause between consecutive catalog queries.
    pub request_delay: Duration,
}

impl Default for AcquireSettings {
    fn default() -> Self {
        Self {
            day_multiplier: 5,
            week_multiplier: 10,
            max_request_size: 100,
            request_delay: Duration::from_millis(1100),
        }
    }
}

impl AcquireSettings {
    pub fn request_size(&self, constraints: &Constraints) -> u32 {
        let multiplier = match constraints.time_frame {
            TimeFrame::Day => self.day_multiplier,
            TimeFrame::Week => self.week_multiplier,
        };

        u32::from(constraints.meal_count)
            .saturating_mul(multiplier)
            .clamp(1, self.max_request_size.max(1))
    }
}

/// Primary query followed by the relaxed tiers, in issue order.
pub fn query_tiers(constraints: &Constraints, number: u32) -> [CatalogQuery; 3] {
    let primary = CatalogQuery {
        diet: constraints.diet.to_owned(),
        exclude_ingredients: constraints.exclude.to_owned(),
        cuisines: constraints.cuisines.to_owned(),
        max_ready_time: constraints.max_prep_minutes,
        number,
    };
    let without_diet = primary.without_diet();
    let unrestricted = primary.unrestricted();

    [primary, without_diet, unrestricted]
}

#[derive(Default)]
struct Pool {
    seen: HashSet<u64>,
    recipes: Vec<Arc<CandidateRecipe>>,
}

impl Pool {
    fn merge(&mut self, batch: Vec<CandidateRecipe>) -> usize {
        let before = self.recipes.len();
        for recipe in batch {
            if self.seen.insert(recipe.id) {
                self.recipes.push(Arc::new(recipe));
            }
        }
        self.recipes.len() - before
    }
}

/// Builds the unique-by-id candidate pool, relaxing the catalog query until
/// enough recipes are found or every tier has been tried.
///
/// A failing query counts as an empty batch. Only an empty final pool is an
/// error.
#[tracing::instrument(skip_all, fields(meal_count = constraints.meal_count, time_frame = %constraints.time_frame))]
pub async fn acquire_pool<C: Catalog + ?Sized>(
    catalog: &C,
    constraints: &Constraints,
    settings: &AcquireSettings,
) -> Result<Vec<Arc<CandidateRecipe>>, MealPlanError> {
    let minimum = usize::from(constraints.meal_count) * MIN_POOL_FACTOR;
    let number = settings.request_size(constraints);
    let mut pool = Pool::default();
    let mut last_ok: Option<&CatalogQuery> = None;
    let tiers = query_tiers(constraints, number);

    for (tier, query) in tiers.iter().enumerate() {
        if tier > 0 {
            if pool.recipes.len() >= minimum {
                break;
            }

            if last_ok == Some(query) {
                continue;
            }

            if !settings.request_delay.is_zero() {
                tokio::time::sleep(settings.request_delay).await;
            }
        }

        match catalog.search(query).await {
            Ok(batch) => {
                let received = batch.len();
                let added = pool.merge(batch);
                last_ok = Some(query);
                tracing::info!(tier, received, added, total = pool.recipes.len(), "catalog query");
            }
            Err(err) => {
                last_ok = None;
                tracing::warn!(tier, error = %err, "catalog query failed");
            }
        }
    }

    if pool.recipes.is_empty() {
        tracing::warn!("candidate pool is empty after every catalog query");
        return Err(MealPlanError::PoolExhausted);
    }

    if pool.recipes.len() < minimum {
        tracing::warn!(
            total = pool.recipes.len(),
            minimum,
            "candidate pool smaller than wanted"
        );
    }

    Ok(pool.recipes)
}
