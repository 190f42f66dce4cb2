use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{CandidateRecipe, Catalog, CatalogError, CatalogQuery, Result};

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CandidateRecipe>,
}

/// Client for a Spoonacular-style `complexSearch` endpoint.
#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpCatalog {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CatalogError::MissingApiKey);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/recipes/complexSearch", self.base_url)
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CandidateRecipe>> {
        let mut params = query.to_params();
        params.push(("addRecipeInformation", "true".to_owned()));
        params.push(("addRecipeNutrition", "true".to_owned()));
        params.push(("apiKey", self.api_key.to_owned()));

        let response = self
            .client
            .get(self.search_url())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api { status, body });
        }

        let payload = response.json::<SearchResponse>().await?;
        tracing::debug!(count = payload.results.len(), "catalog search returned");

        Ok(payload.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let result = HttpCatalog::new("https://api.spoonacular.com", "", Duration::from_secs(5));

        assert!(matches!(result, Err(CatalogError::MissingApiKey)));
    }

    #[test]
    fn test_search_url_strips_trailing_slash() {
        let catalog =
            HttpCatalog::new("https://api.spoonacular.com/", "key", Duration::from_secs(5))
                .unwrap();

        assert_eq!(
            catalog.search_url(),
            "https://api.spoonacular.com/recipes/complexSearch"
        );
    }
}
