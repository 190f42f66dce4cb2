use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealPlanError {
    #[error(
        "No recipes found matching your criteria. Try relaxing your diet, exclusions or time limit."
    )]
    PoolExhausted,

    #[error("Invalid meal plan request: {0}")]
    InvalidRequest(String),
}
