use crate::config::Config;

/// Prints the effective settings after defaults, file and environment are applied.
pub fn check_config(config: &Config) -> anyhow::Result<()> {
    println!("catalog.base_url = {}", config.catalog.base_url);
    println!("catalog.api_key = {}", config.catalog.masked_api_key());
    println!("catalog.request_delay_ms = {}", config.catalog.request_delay_ms);
    println!("catalog.timeout_secs = {}", config.catalog.timeout_secs);
    println!("planner.day_multiplier = {}", config.planner.day_multiplier);
    println!("planner.week_multiplier = {}", config.planner.week_multiplier);
    println!("planner.max_request_size = {}", config.planner.max_request_size);
    println!("planner.jitter = {}", config.planner.jitter);
    println!("planner.bucket_floor = {}", config.planner.bucket_floor);
    println!("observability.log_level = {}", config.observability.log_level);

    if config.catalog.api_key.is_empty() {
        tracing::warn!("catalog api key is not set, only --catalog files can be planned against");
    }

    tracing::info!("configuration is valid");

    Ok(())
}
