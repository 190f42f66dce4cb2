mod check;
mod plan;

pub use check::check_config;
pub use plan::{PlanArgs, generate_plan, plan};
