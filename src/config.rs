use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use plateplan_mealplan::{PlannerSettings, acquire::AcquireSettings};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Pause between consecutive catalog queries
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Api key safe to print: first four characters only.
    pub fn masked_api_key(&self) -> String {
        if self.api_key.is_empty() {
            return "<unset>".to_string();
        }

        let visible = self.api_key.chars().take(4).collect::<String>();
        format!("{visible}****")
    }
}

fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_request_delay_ms() -> u64 {
    1100
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlannerConfig {
    #[serde(default = "default_day_multiplier")]
    pub day_multiplier: u32,
    #[serde(default = "default_week_multiplier")]
    pub week_multiplier: u32,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: u32,
    #[serde(default = "default_jitter")]
    pub jitter: f64,
    #[serde(default = "default_bucket_floor")]
    pub bucket_floor: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            day_multiplier: default_day_multiplier(),
            week_multiplier: default_week_multiplier(),
            max_request_size: default_max_request_size(),
            jitter: default_jitter(),
            bucket_floor: default_bucket_floor(),
        }
    }
}

fn default_day_multiplier() -> u32 {
    5
}

fn default_week_multiplier() -> u32 {
    10
}

fn default_max_request_size() -> u32 {
    100
}

fn default_jitter() -> f64 {
    0.2
}

fn default_bucket_floor() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. `CATALOG_API_KEY`
    /// 2. Environment variables (PLATEPLAN__CATALOG__API_KEY, etc.)
    /// 3. Config file specified by path, `CONFIG_PATH` or `config/default.toml`
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Set defaults
        builder = builder
            .set_default("catalog.base_url", default_base_url())?
            .set_default("observability.log_level", default_log_level())?;

        // Load config file if path provided or CONFIG_PATH env var set
        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional; a missing file falls back to defaults
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        // Override with environment variables (PLATEPLAN__CATALOG__API_KEY, etc.)
        builder = builder.add_source(
            Environment::with_prefix("PLATEPLAN")
                .separator("__")
                .try_parsing(true),
        );

        // Also support the legacy api key variable without prefix
        if let Ok(api_key) = env::var("CATALOG_API_KEY") {
            builder = builder.set_override("catalog.api_key", api_key)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.planner.day_multiplier == 0 || self.planner.week_multiplier == 0 {
            return Err("Planner multipliers must be at least 1".to_string());
        }
        if self.planner.max_request_size == 0 {
            return Err("Planner max_request_size must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.planner.jitter) {
            return Err(format!(
                "Planner jitter must be between 0.0 and 1.0, got {}",
                self.planner.jitter
            ));
        }
        if self.catalog.timeout_secs == 0 {
            return Err("Catalog timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            acquire: AcquireSettings {
                day_multiplier: self.planner.day_multiplier,
                week_multiplier: self.planner.week_multiplier,
                max_request_size: self.planner.max_request_size,
                request_delay: self.catalog.request_delay(),
            },
            jitter: self.planner.jitter,
            bucket_floor: self.planner.bucket_floor,
        }
    }
}
