#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use plateplan_catalog::{
    CandidateRecipe, Catalog, CatalogError, CatalogQuery, Nutrient, Nutrition, Result,
};
use plateplan_mealplan::{PlannerSettings, acquire::AcquireSettings};

const DISH_TYPES: [&str; 4] = ["breakfast", "main course", "dinner", "snack"];

pub fn settings() -> PlannerSettings {
    PlannerSettings {
        acquire: AcquireSettings {
            request_delay: Duration::ZERO,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn recipe(id: u64, dish_type: &str, calories: Option<f64>, diets: &[&str]) -> CandidateRecipe {
    CandidateRecipe {
        id,
        title: format!("recipe {id}"),
        ready_in_minutes: Some(10 + (id % 50) as u32),
        servings: Some(2),
        nutrition: calories.map(|calories| Nutrition {
            nutrients: vec![
                Nutrient::new("Calories", calories, "kcal"),
                Nutrient::new("Protein", 20.0, "g"),
                Nutrient::new("Carbohydrates", 40.0, "g"),
                Nutrient::new("Fat", 12.0, "g"),
            ],
        }),
        dish_types: vec![dish_type.to_owned()],
        diets: diets.iter().map(|d| d.to_string()).collect(),
        cuisines: vec![],
    }
}

/// `count` recipes spread over every dish type with varied calories.
pub fn recipes(count: u64) -> Vec<CandidateRecipe> {
    (1..=count)
        .map(|id| {
            let dish_type = DISH_TYPES[(id % 4) as usize];
            let calories = 200.0 + ((id * 37) % 600) as f64;
            recipe(id, dish_type, Some(calories), &[])
        })
        .collect()
}

/// Catalog answering from a queue of canned responses and recording every
/// query it receives. Answers an empty batch once the queue is drained.
#[derive(Default)]
pub struct ScriptedCatalog {
    responses: Mutex<VecDeque<Result<Vec<CandidateRecipe>>>>,
    queries: Mutex<Vec<CatalogQuery>>,
}

impl ScriptedCatalog {
    pub fn new(responses: Vec<Result<Vec<CandidateRecipe>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::default(),
        }
    }

    pub fn failing(times: usize) -> Self {
        Self::new((0..times).map(|_| Err(CatalogError::MissingApiKey)).collect())
    }

    pub fn queries(&self) -> Vec<CatalogQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CandidateRecipe>> {
        self.queries.lock().unwrap().push(query.clone());

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![]))
    }
}
