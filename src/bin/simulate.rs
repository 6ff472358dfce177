use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flood_forecast_service::app::Application;
use flood_forecast_service::config::Config;
use flood_forecast_service::services::{ForecastRequest, ForecastService, SimulationReport};

#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Run a single flood risk forecast and print the result", long_about = None)]
struct Cli {
    /// Base date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<String>,

    /// City to forecast for
    #[arg(long, default_value = "Budapest")]
    city: String,

    /// Country of the city (name or ISO code)
    #[arg(long, default_value = "Hungary")]
    country: String,

    /// Seed for reproducible weather and temperature noise
    #[arg(long, env = "FORECAST_SEED")]
    seed: Option<u64>,

    /// Number of days to simulate (defaults to SIMULATION_DAYS)
    #[arg(long)]
    days: Option<usize>,

    /// Skip geocoding and historical lookups and use the fallback defaults
    #[arg(long)]
    offline: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn print_table(report: &SimulationReport) {
    println!(
        "Flood forecast for {}, {} ({:.4}, {:.4}) from {}",
        report.city, report.country, report.latitude, report.longitude, report.date
    );
    println!(
        "Baseline: {:.1} °C, trend {:+.5}, soil moisture {:.1}% ({:?} data)",
        report.avg_temperature,
        report.temperature_trend,
        report.initial_soil_moisture,
        report.data_source
    );
    println!();
    println!(
        "{:<12} {:>9} {:>9} {:>9} {:>9} {:>9}  Risk",
        "Date", "Rain mm", "Pred °C", "Temp °C", "Soil %", "Level m"
    );

    for i in 0..report.days {
        println!(
            "{:<12} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>9.2}  {}",
            report.dates[i].to_string(),
            report.rainfall[i],
            report.predicted_temperatures[i],
            report.actual_temperatures[i],
            report.soil_moisture[i],
            report.river_levels[i],
            report.daily_risk[i]
        );
    }

    println!();
    println!(
        "Overall risk: {} (peak {:.2} m of {:.1} m capacity, seed {})",
        report.flood_risk, report.peak_level, report.max_capacity, report.seed
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let service = if cli.offline {
        info!("Offline mode, using fallback location and baseline");
        ForecastService::offline(config.forecast_settings())
    } else {
        Application::forecast_service(&config)?
    };

    let request = ForecastRequest {
        date: cli
            .date
            .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string()),
        city: cli.city,
        country: cli.country,
        seed: cli.seed,
        days: cli.days,
    };

    let report = service.forecast(&request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }

    Ok(())
}
