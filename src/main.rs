//! aare-fetch
//!
//! Command-line front end over the Aare data-access layer.
//!
//! ```text
//!   CLI args ─▶ config (file or AARE_* env) ─▶ ScopedClient (one session)
//!                                                  │
//!                      ┌───────────────────────────┼────────────────────────┐
//!                      ▼                           ▼                        ▼
//!              single endpoint          compare (fan-out)       forecast (fan-out)
//!                      │                           │                        │
//!                      └──────────────▶ pretty JSON on stdout ◀─────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use aare_fetch::config::{self, AppConfig};
use aare_fetch::fanout::FanOut;
use aare_fetch::observability::logging;
use aare_fetch::service;
use aare_fetch::ScopedClient;

#[derive(Parser)]
#[command(name = "aare-fetch")]
#[command(about = "Query Aare river conditions", long_about = None)]
struct Cli {
    /// TOML config file; without it, defaults plus AARE_* environment overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all cities with data
    Cities,
    /// Minimal current reading for a city
    Today { city: String },
    /// Full current conditions for a city
    Current { city: String },
    /// Current data for all cities
    Widget,
    /// Historical time series for a city
    History {
        city: String,
        /// ISO date, unix timestamp or relative ("-7 days")
        #[arg(default_value = "-7 days", allow_hyphen_values = true)]
        start: String,
        #[arg(default_value = "now", allow_hyphen_values = true)]
        end: String,
    },
    /// Compare current conditions across cities (all when none given)
    Compare { cities: Vec<String> },
    /// Two-hour temperature trend for one or more cities
    Forecast {
        #[arg(required = true)]
        cities: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_from_env()?,
    };
    logging::init(&config.logging);

    tracing::info!(
        base_url = %config.upstream.base_url,
        cache_ttl_secs = config.cache.ttl_secs,
        min_interval_ms = config.rate_limit.min_interval_ms,
        "Configuration loaded"
    );

    let client = ScopedClient::open(&config)?;
    let result = run(&client, &config, cli.command).await;
    client.close();

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(
    client: &ScopedClient,
    config: &AppConfig,
    command: Commands,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let fan_out = FanOut::from_config(&config.fanout);
    let value = match command {
        Commands::Cities => client.cities().await?,
        Commands::Today { city } => client.today(&city).await?,
        Commands::Current { city } => client.current(&city).await?,
        Commands::Widget => client.widget().await?,
        Commands::History { city, start, end } => client.history(&city, &start, &end).await?,
        Commands::Compare { cities } => {
            let cities = (!cities.is_empty()).then_some(cities);
            to_json(&service::compare_cities(client, &fan_out, cities).await?)?
        }
        Commands::Forecast { cities } => {
            to_json(&service::forecasts(client, &fan_out, cities).await?)?
        }
    };
    Ok(value)
}

fn to_json<T: Serialize>(report: &T) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(report)
}
