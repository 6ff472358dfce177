use chrono::{Days, Months, NaiveDate};
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::fetch_error::FetchError;
use crate::http_client::UpstreamClient;
use crate::models::HistoricalSample;

const HOURLY_VARIABLES: &str = "temperature_2m,soil_moisture_0_to_7cm";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    soil_moisture_0_to_7cm: Option<Vec<Option<f64>>>,
}

/// Readings from one archived window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSeries {
    pub temperatures: Vec<f64>,
    /// Percent, converted from the volumetric fraction the archive reports.
    pub soil_moisture: Vec<f64>,
}

/// Pulls hourly temperature and soil moisture around the same calendar date
/// in each of the previous years.
#[derive(Clone)]
pub struct HistoricalDataFetcher {
    client: UpstreamClient,
    url: String,
    years: u32,
    window_days: u64,
}

impl HistoricalDataFetcher {
    pub fn new(client: UpstreamClient, url: String, years: u32, window_days: u64) -> Self {
        Self {
            client,
            url,
            years,
            window_days,
        }
    }

    /// Concatenated sample, oldest year first, or `None` if any window fails.
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        end_date: NaiveDate,
    ) -> Option<HistoricalSample> {
        match self.try_fetch(latitude, longitude, end_date).await {
            Ok(sample) => Some(sample),
            Err(e) => {
                warn!(
                    "Historical data unavailable for {:.4}, {:.4} around {}: {}",
                    latitude, longitude, end_date, e
                );
                None
            }
        }
    }

    #[instrument(skip(self), fields(url = %self.url, years = self.years))]
    pub async fn try_fetch(
        &self,
        latitude: f64,
        longitude: f64,
        end_date: NaiveDate,
    ) -> Result<HistoricalSample, FetchError> {
        let windows = history_windows(end_date, self.years, self.window_days);
        if windows.is_empty() {
            return Err(FetchError::Malformed(format!(
                "no historical windows before {end_date}"
            )));
        }
        debug!("Fetching {} yearly windows", windows.len());

        let series = try_join_all(
            windows
                .iter()
                .map(|&(start, end)| self.fetch_window(latitude, longitude, start, end)),
        )
        .await?;

        let mut sample = HistoricalSample::default();
        let mut moisture = Vec::new();
        for window in series {
            sample.temperatures.extend(window.temperatures);
            moisture.extend(window.soil_moisture);
        }
        if !moisture.is_empty() {
            sample.soil_moisture = Some(moisture);
        }

        info!(
            "Fetched {} temperature and {} moisture readings",
            sample.temperatures.len(),
            sample.soil_moisture.as_ref().map_or(0, Vec::len)
        );
        Ok(sample)
    }

    #[instrument(skip(self))]
    async fn fetch_window(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WindowSeries, FetchError> {
        let query = [
            ("latitude", format!("{latitude:.4}")),
            ("longitude", format!("{longitude:.4}")),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
            ("hourly", HOURLY_VARIABLES.to_string()),
            ("timezone", "UTC".to_string()),
        ];
        let body = self.client.get_text(&self.url, &query).await?;
        parse_window(&body)
    }
}

/// `(start, end)` windows of ±`window_days` around `end_date` shifted back
/// 1..=`years` years, oldest first.
///
/// Feb 29 shifts onto Feb 28 in non-leap years.
pub fn history_windows(end_date: NaiveDate, years: u32, window_days: u64) -> Vec<(NaiveDate, NaiveDate)> {
    (1..=years)
        .rev()
        .filter_map(|years_back| {
            let center = end_date.checked_sub_months(Months::new(12 * years_back))?;
            let start = center.checked_sub_days(Days::new(window_days))?;
            let end = center.checked_add_days(Days::new(window_days))?;
            Some((start, end))
        })
        .collect()
}

/// Parses one archive payload. Mismatched column lengths or a window without
/// any temperature reading count as malformed; null cells are skipped.
pub fn parse_window(body: &str) -> Result<WindowSeries, FetchError> {
    let response: ArchiveResponse = serde_json::from_str(body)?;
    let hourly = response.hourly;

    if hourly.temperature_2m.len() != hourly.time.len() {
        return Err(FetchError::Malformed(format!(
            "temperature column has {} values for {} timestamps",
            hourly.temperature_2m.len(),
            hourly.time.len()
        )));
    }

    let temperatures: Vec<f64> = hourly
        .temperature_2m
        .into_iter()
        .flatten()
        .filter(|t| t.is_finite())
        .collect();
    if temperatures.is_empty() {
        return Err(FetchError::Malformed(
            "window contains no temperature readings".to_string(),
        ));
    }

    let soil_moisture = match hourly.soil_moisture_0_to_7cm {
        Some(column) if column.len() != hourly.time.len() => {
            return Err(FetchError::Malformed(format!(
                "soil moisture column has {} values for {} timestamps",
                column.len(),
                hourly.time.len()
            )));
        }
        Some(column) => column
            .into_iter()
            .flatten()
            .filter(|m| m.is_finite())
            .map(|fraction| (fraction * 100.0).clamp(0.0, 100.0))
            .collect(),
        None => Vec::new(),
    };

    Ok(WindowSeries {
        temperatures,
        soil_moisture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_history_windows_oldest_first() {
        let windows = history_windows(date(2025, 6, 15), 5, 3);

        assert_eq!(windows.len(), 5);
        assert_eq!(windows[0], (date(2020, 6, 12), date(2020, 6, 18)));
        assert_eq!(windows[4], (date(2024, 6, 12), date(2024, 6, 18)));
    }

    #[test]
    fn test_history_windows_leap_day() {
        let windows = history_windows(date(2024, 2, 29), 1, 3);
        assert_eq!(windows, vec![(date(2023, 2, 25), date(2023, 3, 3))]);
    }

    #[test]
    fn test_history_windows_zero_years() {
        assert!(history_windows(date(2025, 1, 1), 0, 3).is_empty());
    }

    #[test]
    fn test_parse_window_skips_nulls_and_converts_moisture() {
        let body = r#"{
            "latitude": 47.5, "longitude": 19.0,
            "hourly": {
                "time": ["2024-06-12T00:00", "2024-06-12T01:00", "2024-06-12T02:00"],
                "temperature_2m": [18.5, null, 17.9],
                "soil_moisture_0_to_7cm": [0.312, 0.305, null]
            }
        }"#;

        let window = parse_window(body).unwrap();
        assert_eq!(window.temperatures, vec![18.5, 17.9]);
        assert_eq!(window.soil_moisture.len(), 2);
        assert!((window.soil_moisture[0] - 31.2).abs() < 1e-9);
    }

    #[test]
    fn test_parse_window_without_moisture_column() {
        let body = r#"{"hourly": {"time": ["2024-06-12T00:00"], "temperature_2m": [20.0]}}"#;
        let window = parse_window(body).unwrap();
        assert_eq!(window.temperatures, vec![20.0]);
        assert!(window.soil_moisture.is_empty());
    }

    #[test]
    fn test_parse_window_length_mismatch_is_malformed() {
        let body = r#"{"hourly": {"time": ["a", "b"], "temperature_2m": [20.0]}}"#;
        assert!(matches!(parse_window(body), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_parse_window_all_null_is_malformed() {
        let body = r#"{"hourly": {"time": ["a", "b"], "temperature_2m": [null, null]}}"#;
        assert!(matches!(parse_window(body), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_parse_window_error_payload_is_rejected() {
        let body = r#"{"error": true, "reason": "Parameter 'start_date' is out of range"}"#;
        assert!(matches!(parse_window(body), Err(FetchError::Json(_))));
    }
}
