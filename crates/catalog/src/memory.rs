use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{CandidateRecipe, Catalog, CatalogQuery, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<CandidateRecipe>),
    Search { results: Vec<CandidateRecipe> },
}

/// In-process catalog over a fixed recipe list.
///
/// Applies the query filters the way the remote search does: diet tag,
/// cuisine, ready time and excluded terms in the title.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    recipes: Vec<CandidateRecipe>,
}

impl MemoryCatalog {
    pub fn new(recipes: Vec<CandidateRecipe>) -> Self {
        Self { recipes }
    }

    /// Accepts either a bare recipe array or a `{ "results": [...] }` search payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let recipes = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::List(recipes) => recipes,
            CatalogFile::Search { results } => results,
        };

        Ok(Self::new(recipes))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

fn squash(value: &str) -> String {
    value.to_lowercase().replace(['-', '_'], " ")
}

fn matches(recipe: &CandidateRecipe, query: &CatalogQuery) -> bool {
    if let Some(diet) = &query.diet {
        let diet = squash(diet);
        if !recipe.diets.iter().any(|tag| squash(tag) == diet) {
            return false;
        }
    }

    if !query.cuisines.is_empty() {
        let found = recipe.cuisines.iter().any(|cuisine| {
            query
                .cuisines
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(cuisine))
        });
        if !found {
            return false;
        }
    }

    if let (Some(max), Some(ready)) = (query.max_ready_time, recipe.ready_in_minutes) {
        if ready > max {
            return false;
        }
    }

    let title = recipe.title.to_lowercase();
    !query
        .exclude_ingredients
        .iter()
        .any(|term| !term.is_empty() && title.contains(&term.to_lowercase()))
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CandidateRecipe>> {
        Ok(self
            .recipes
            .iter()
            .filter(|recipe| matches(recipe, query))
            .take(query.number as usize)
            .cloned()
            .collect())
    }
}
