use std::path::PathBuf;

use anyhow::Result;
use carecompass::api::AppState;
use carecompass::{CareCompassConfig, VERSION, telemetry, web};
use clap::Parser;

/// Tool server for a mental-health support assistant
#[derive(Debug, Parser)]
#[command(name = "carecompass", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "CARECOMPASS_CONFIG")]
    config: Option<PathBuf>,

    /// Validate configuration and credentials, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CareCompassConfig::load_from_path(cli.config)?;
    let telemetry = telemetry::init(&config.logging)?;

    tracing::info!("CareCompass {} starting", VERSION);

    let state = AppState::from_config(&config)?;

    if cli.check {
        println!("Configuration OK");
        println!("  LLM: {} at {}", config.llm.model, config.llm.endpoint);
        println!("  Search radius: {}m, max results: {}", config.maps.search_radius_m, config.maps.max_results);
        println!("  Log level: {}", config.logging.level);
        telemetry.shutdown();
        return Ok(());
    }

    let result = web::run(&config.server, state).await;
    telemetry.shutdown();
    result
}
