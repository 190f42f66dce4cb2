use std::sync::Arc;

use plateplan_catalog::{CandidateRecipe, Catalog};
use rand::{Rng, SeedableRng, rngs::StdRng};
use time::Date;

use crate::acquire::{AcquireSettings, acquire_pool};
use crate::assign::{JITTER, PlanningState, assign_days};
use crate::classify::{BUCKET_FLOOR, classify};
use crate::filter::filter_candidates;
use crate::plan::{self, MealPlan, PlanRequest};
use crate::{Constraints, MealPlanError};

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    pub acquire: AcquireSettings,
    /// Upper bound of the random tie-breaker added to each candidate score.
    pub jitter: f64,
    /// Minimum recipes per bucket before rebalancing stops.
    pub bucket_floor: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            acquire: AcquireSettings::default(),
            jitter: JITTER,
            bucket_floor: BUCKET_FLOOR,
        }
    }
}

pub struct MealPlanner<C> {
    catalog: C,
    settings: PlannerSettings,
}

impl<C: Catalog> MealPlanner<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_settings(catalog, PlannerSettings::default())
    }

    pub fn with_settings(catalog: C, settings: PlannerSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Validates the request, gathers candidates from the catalog and builds
    /// the plan.
    #[tracing::instrument(skip_all, fields(time_frame = %request.time_frame))]
    pub async fn generate(&self, request: PlanRequest) -> Result<MealPlan, MealPlanError> {
        self.generate_from(request, plan::today()).await
    }

    /// Same as [`Self::generate`] with an explicit "today" for requests
    /// without a start date.
    pub async fn generate_from(
        &self,
        request: PlanRequest,
        today: Date,
    ) -> Result<MealPlan, MealPlanError> {
        let input = request.validate(today)?;
        let pool = acquire_pool(&self.catalog, &input.constraints, &self.settings.acquire).await?;

        let mut rng = match input.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let plan = build_plan(&pool, &input.constraints, input.start, &self.settings, &mut rng);

        tracing::info!(
            days = plan.days.len(),
            meals = plan.selections.len(),
            skipped = plan.skipped_slots,
            tier = %plan.filter_tier,
            "meal plan generated"
        );

        Ok(plan)
    }
}

/// Pure planning stage: filter, classify and assign a candidate pool that
/// has already been fetched.
pub fn build_plan<R: Rng>(
    pool: &[Arc<CandidateRecipe>],
    constraints: &Constraints,
    start: Date,
    settings: &PlannerSettings,
    rng: &mut R,
) -> MealPlan {
    let filtered = filter_candidates(pool, constraints);
    let buckets = classify(&filtered.recipes, settings.bucket_floor, rng);

    let days = assign_days(
        PlanningState::new(buckets),
        &filtered.recipes,
        constraints,
        start,
        settings.jitter,
        rng,
    );

    MealPlan::new(days, filtered.tier)
}
