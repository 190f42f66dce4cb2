use anyhow::Result;
use clap::{Parser, Subcommand};
use plateplan::cli::PlanArgs;

/// plateplan - Constrained meal plan generation
#[derive(Parser)]
#[command(name = "plateplan", version)]
#[command(about = "Build day or week meal plans from a recipe catalog", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a meal plan and print it as JSON
    Plan(PlanArgs),
    /// Load and validate configuration, then print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = plateplan::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    plateplan::observability::init_observability(
        "plateplan",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Plan(args) => plateplan::cli::plan(config, args).await,
        Commands::CheckConfig => plateplan::cli::check_config(&config),
    }
}
