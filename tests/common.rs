#![allow(dead_code)]

use std::time::Duration;

use flood_forecast_service::geocoder::Geocoder;
use flood_forecast_service::historical_fetcher::HistoricalDataFetcher;
use flood_forecast_service::http_client::UpstreamClient;

pub const GEOCODING_PATH: &str = "/v1/search";
pub const ARCHIVE_PATH: &str = "/v1/archive";

/// Client with a short timeout and `retries` fast retries
pub fn test_client(retries: usize) -> UpstreamClient {
    UpstreamClient::new(Duration::from_secs(5), retries)
        .expect("Failed to build HTTP client")
        .with_min_retry_delay(Duration::from_millis(1))
}

pub fn geocoder(server_url: &str, retries: usize) -> Geocoder {
    Geocoder::new(test_client(retries), format!("{server_url}{GEOCODING_PATH}"))
}

pub fn historical_fetcher(server_url: &str, years: u32) -> HistoricalDataFetcher {
    HistoricalDataFetcher::new(
        test_client(0),
        format!("{server_url}{ARCHIVE_PATH}"),
        years,
        3,
    )
}

/// Open-Meteo style geocoding payload with a single match
pub fn geocoding_body(name: &str, country: &str, latitude: f64, longitude: f64) -> String {
    serde_json::json!({
        "results": [{
            "name": name,
            "latitude": latitude,
            "longitude": longitude,
            "country": country,
            "country_code": "XX"
        }],
        "generationtime_ms": 0.4
    })
    .to_string()
}

/// Open-Meteo style archive payload; moisture given as volumetric fractions
pub fn archive_body(temperatures: &[f64], moisture: &[f64]) -> String {
    let time: Vec<String> = (0..temperatures.len())
        .map(|h| format!("2024-06-12T{:02}:00", h % 24))
        .collect();
    serde_json::json!({
        "latitude": 47.5,
        "longitude": 19.0,
        "hourly": {
            "time": time,
            "temperature_2m": temperatures,
            "soil_moisture_0_to_7cm": moisture
        }
    })
    .to_string()
}
