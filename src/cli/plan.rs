use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use plateplan_catalog::{Catalog, HttpCatalog, MemoryCatalog};
use plateplan_mealplan::{MealPlan, MealPlanner, PlanRequest, TimeFrame};

use crate::config::Config;

#[derive(Args, Debug, Default, Clone)]
pub struct PlanArgs {
    /// JSON request file; flags below override its fields
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// Recipe catalog JSON file used instead of the remote catalog
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Plan length: day or week
    #[arg(long)]
    pub time_frame: Option<TimeFrame>,

    /// Daily calorie target
    #[arg(long)]
    pub calories: Option<u32>,

    #[arg(long)]
    pub diet: Option<String>,

    /// Excluded ingredients or allergens, comma separated
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub cuisine: Vec<String>,

    /// Meals per day (1-6)
    #[arg(long)]
    pub meal_count: Option<u8>,

    /// Maximum preparation time in minutes
    #[arg(long)]
    pub ready_time: Option<u32>,

    /// First plan day, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    /// Seed for reproducible plans
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pretty-print the plan
    #[arg(long)]
    pub pretty: bool,
}

impl PlanArgs {
    pub fn to_request(&self) -> Result<PlanRequest> {
        let mut request = match &self.request {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read request {}", path.display()))?;
                serde_json::from_str::<PlanRequest>(&json)
                    .with_context(|| format!("invalid request {}", path.display()))?
            }
            None => PlanRequest::default(),
        };

        if let Some(time_frame) = self.time_frame {
            request.time_frame = time_frame;
        }
        if let Some(calories) = self.calories {
            request.target_calories = Some(calories);
        }
        if let Some(diet) = &self.diet {
            request.diet = Some(diet.to_owned());
        }
        if !self.exclude.is_empty() {
            request.exclude = self.exclude.to_owned();
        }
        if !self.cuisine.is_empty() {
            request.preferences.cuisines = self.cuisine.to_owned();
        }
        if let Some(meal_count) = self.meal_count {
            request.preferences.meal_count = Some(meal_count);
        }
        if let Some(ready_time) = self.ready_time {
            request.preferences.ready_time = Some(ready_time);
        }
        if let Some(date) = &self.date {
            request.date = Some(date.to_owned());
        }
        if let Some(seed) = self.seed {
            request.seed = Some(seed);
        }

        Ok(request)
    }
}

/// Builds the plan against the catalog file, or the remote catalog when none
/// is given.
#[tracing::instrument(skip_all)]
pub async fn generate_plan(config: &Config, args: &PlanArgs) -> Result<MealPlan> {
    let request = args.to_request()?;
    let mut settings = config.planner_settings();

    let catalog: Box<dyn Catalog> = match &args.catalog {
        Some(path) => {
            let catalog = MemoryCatalog::from_path(path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?;
            tracing::info!(recipes = catalog.len(), path = %path.display(), "loaded catalog file");
            settings.acquire.request_delay = Duration::ZERO;
            Box::new(catalog)
        }
        None => Box::new(HttpCatalog::new(
            &config.catalog.base_url,
            &config.catalog.api_key,
            config.catalog.timeout(),
        )?),
    };

    let planner = MealPlanner::with_settings(catalog, settings);

    Ok(planner.generate(request).await?)
}

pub async fn plan(config: Config, args: PlanArgs) -> Result<()> {
    let plan = generate_plan(&config, &args).await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&plan)?
    } else {
        serde_json::to_string(&plan)?
    };

    println!("{json}");

    Ok(())
}
