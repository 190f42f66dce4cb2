mod error;
mod http;
mod memory;
mod query;
mod recipe;

pub use error::*;
pub use http::*;
pub use memory::*;
pub use query::*;
pub use recipe::*;

use async_trait::async_trait;

/// Recipe search provider queried while building the candidate pool.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CandidateRecipe>>;
}

#[async_trait]
impl<C: Catalog + ?Sized> Catalog for Box<C> {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CandidateRecipe>> {
        (**self).search(query).await
    }
}
