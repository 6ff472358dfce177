use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use flood_forecast_service::api::generate_openapi_spec;

#[derive(Parser)]
#[command(name = "generate-openapi")]
#[command(about = "Write the forecast API's OpenAPI document", long_about = None)]
struct Cli {
    /// Destination file
    #[arg(long, short, default_value = "openapi.json")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let json = serde_json::to_string_pretty(&generate_openapi_spec())?;
    fs::write(&cli.output, json)?;
    println!("Wrote OpenAPI document to {}", cli.output.display());
    Ok(())
}
