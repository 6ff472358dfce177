use chrono::{Datelike, Days, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::config::ForecastSettings;
use crate::forecast::{self, ForecastError};
use crate::geocoder::{Coordinates, Geocoder};
use crate::historical_fetcher::HistoricalDataFetcher;
use crate::models::{DayOutcome, HistoricalSample, RiverState, SoilCondition};
use crate::risk;
use crate::simulation::RiverSimulator;
use crate::stats::HistoricalStats;
use crate::weather;

/// Error types for forecast requests
#[derive(Debug, thiserror::Error)]
pub enum ForecastServiceError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// A forecast is keyed by base date and location.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequest {
    pub date: String,
    pub city: String,
    pub country: String,
    /// Reuse a seed to reproduce an earlier run.
    pub seed: Option<u64>,
    /// Overrides the configured horizon.
    pub days: Option<usize>,
}

/// Where the temperature baseline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Historical,
    Fallback,
}

/// Temperature and moisture baseline feeding the forecast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub mean_temperature: f64,
    pub temperature_trend: f64,
    pub soil_moisture: f64,
    pub source: DataSource,
}

impl Baseline {
    /// Statistics from `sample`, or the flat defaults when the sample is
    /// missing or unusable.
    pub fn from_sample(sample: Option<&HistoricalSample>, settings: &ForecastSettings) -> Self {
        let fallback = Self {
            mean_temperature: settings.default_temperature,
            temperature_trend: 0.0,
            soil_moisture: settings.default_soil_moisture,
            source: DataSource::Fallback,
        };

        let Some(sample) = sample else {
            warn!(
                "No historical data, using defaults ({:.1} °C, {:.1}% moisture)",
                fallback.mean_temperature, fallback.soil_moisture
            );
            return fallback;
        };

        match HistoricalStats::from_sample(sample) {
            Ok(stats) => {
                debug!(
                    "Historical baseline: mean {:.2} °C, trend {:.5}/step over {} samples",
                    stats.mean_temperature, stats.temperature_trend, stats.sample_count
                );
                Self {
                    mean_temperature: stats.mean_temperature,
                    temperature_trend: stats.temperature_trend,
                    soil_moisture: stats
                        .mean_soil_moisture
                        .unwrap_or(settings.default_soil_moisture),
                    source: DataSource::Historical,
                }
            }
            Err(e) => {
                warn!("Historical statistics failed, using defaults: {}", e);
                fallback
            }
        }
    }
}

/// Flat per-day arrays plus scalar summaries. Every array has one entry per
/// simulated day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SimulationReport {
    pub date: NaiveDate,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_resolved: bool,
    pub data_source: DataSource,
    pub seed: u64,
    pub days: usize,
    pub dates: Vec<NaiveDate>,
    pub river_levels: Vec<f64>,
    pub rainfall: Vec<f64>,
    pub soil_moisture: Vec<f64>,
    pub predicted_temperatures: Vec<f64>,
    pub actual_temperatures: Vec<f64>,
    pub daily_risk: Vec<String>,
    pub avg_temperature: f64,
    pub temperature_trend: f64,
    pub initial_soil_moisture: f64,
    pub flood_risk: String,
    pub peak_level: f64,
    pub current_level: f64,
    pub max_capacity: f64,
}

/// Orchestrates geocoding, history, forecast, weather, simulation and risk.
///
/// Upstream failures never fail a request: the location falls back to the
/// configured default and the baseline to flat defaults.
#[derive(Clone)]
pub struct ForecastService {
    geocoder: Option<Geocoder>,
    historical: Option<HistoricalDataFetcher>,
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(
        geocoder: Geocoder,
        historical: HistoricalDataFetcher,
        settings: ForecastSettings,
    ) -> Self {
        Self {
            geocoder: Some(geocoder),
            historical: Some(historical),
            settings,
        }
    }

    /// A service that never touches the network.
    pub fn offline(settings: ForecastSettings) -> Self {
        Self {
            geocoder: None,
            historical: None,
            settings,
        }
    }

    #[instrument(skip(self), fields(date = %request.date, city = %request.city, country = %request.country))]
    pub async fn forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<SimulationReport, ForecastServiceError> {
        let date = parse_date(&request.date)?;
        let horizon = request.days.unwrap_or(self.settings.simulation_days);
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon.into());
        }

        let (coordinates, location_resolved) = self.locate(&request.city, &request.country).await;

        let sample = match &self.historical {
            Some(historical) => {
                historical
                    .fetch(coordinates.latitude, coordinates.longitude, date)
                    .await
            }
            None => None,
        };
        let baseline = Baseline::from_sample(sample.as_ref(), &self.settings);

        let seed = request.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut report = run_forecast(date, horizon, &baseline, &self.settings, &mut rng)?;
        report.city = request.city.clone();
        report.country = request.country.clone();
        report.latitude = coordinates.latitude;
        report.longitude = coordinates.longitude;
        report.location_resolved = location_resolved;
        report.seed = seed;

        info!(
            "Forecast for {}, {} from {}: {} over {} days (peak {:.2} m, source {:?})",
            request.city,
            request.country,
            date,
            report.flood_risk,
            report.days,
            report.peak_level,
            report.data_source
        );

        Ok(report)
    }

    async fn locate(&self, city: &str, country: &str) -> (Coordinates, bool) {
        let resolved = match &self.geocoder {
            Some(geocoder) => geocoder.resolve(city, country).await,
            None => None,
        };

        match resolved {
            Some(coordinates) => (coordinates, true),
            None => {
                warn!(
                    "Using default location {:.2}, {:.2} for {}, {}",
                    self.settings.default_latitude, self.settings.default_longitude, city, country
                );
                (
                    Coordinates {
                        latitude: self.settings.default_latitude,
                        longitude: self.settings.default_longitude,
                    },
                    false,
                )
            }
        }
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ForecastServiceError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ForecastServiceError::InvalidDate(value.to_string()))
}

/// Runs the forecast pipeline for a baseline with an injected random source.
///
/// Draw order is fixed (temperatures, rainfall, extreme events) so a seeded
/// source reproduces the same report. Location fields are left at the
/// defaults for the caller to fill in.
pub fn run_forecast<R: Rng + ?Sized>(
    date: NaiveDate,
    horizon: usize,
    baseline: &Baseline,
    settings: &ForecastSettings,
    rng: &mut R,
) -> Result<SimulationReport, ForecastError> {
    let anchor = date.ordinal();

    let predicted = if settings.seasonal_model {
        forecast::seasonal_forecast(
            baseline.mean_temperature,
            baseline.temperature_trend,
            horizon,
            anchor,
            rng,
        )?
    } else {
        forecast::linear_forecast(baseline.mean_temperature, baseline.temperature_trend, horizon)?
    };

    let mut samples = weather::generate(rng, horizon, anchor + 1);
    for (sample, point) in samples.iter_mut().zip(&predicted) {
        sample.temperature_c = point.temperature_c;
    }
    if settings.extreme_events {
        for (day, sample) in samples.iter_mut().enumerate() {
            if let Some(event) = weather::apply_extreme_event(sample, rng) {
                debug!(day = day + 1, ?event, "Extreme event");
            }
        }
    }

    let actual_temperatures: Vec<f64> = samples.iter().map(|s| s.temperature_c).collect();

    let initial_river = RiverState::new(
        settings.initial_river_level,
        settings.max_capacity,
        baseline.soil_moisture,
    );
    let initial_soil = SoilCondition::new(baseline.soil_moisture);

    let simulator = RiverSimulator::new(settings.hydrology);
    let outcomes = simulator.simulate(initial_river, initial_soil, &samples, &actual_temperatures);
    let overall = risk::overall_risk(&outcomes);

    let dates = (1..=horizon as u64)
        .map(|offset| date.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX))
        .collect();

    Ok(SimulationReport {
        date,
        city: String::new(),
        country: String::new(),
        latitude: settings.default_latitude,
        longitude: settings.default_longitude,
        location_resolved: false,
        data_source: baseline.source,
        seed: 0,
        days: outcomes.len(),
        dates,
        river_levels: levels(&outcomes),
        rainfall: samples.iter().map(|s| s.rainfall_mm).collect(),
        soil_moisture: outcomes.iter().map(|o| o.river.soil_moisture).collect(),
        predicted_temperatures: forecast::temperatures(&predicted),
        actual_temperatures,
        daily_risk: outcomes.iter().map(|o| o.warning.label().to_string()).collect(),
        avg_temperature: baseline.mean_temperature,
        temperature_trend: baseline.temperature_trend,
        initial_soil_moisture: initial_soil.moisture,
        flood_risk: overall.label().to_string(),
        peak_level: risk::peak_level(&outcomes),
        current_level: outcomes
            .last()
            .map_or(initial_river.current_level, |o| o.river.current_level),
        max_capacity: initial_river.max_capacity,
    })
}

fn levels(outcomes: &[DayOutcome]) -> Vec<f64> {
    outcomes.iter().map(|o| o.river.current_level).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback_baseline() -> Baseline {
        Baseline::from_sample(None, &ForecastSettings::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_baseline_falls_back_without_sample() {
        let baseline = fallback_baseline();
        assert_eq!(baseline.mean_temperature, 20.0);
        assert_eq!(baseline.temperature_trend, 0.0);
        assert_eq!(baseline.soil_moisture, 50.0);
        assert_eq!(baseline.source, DataSource::Fallback);
    }

    #[test]
    fn test_baseline_falls_back_on_single_point_sample() {
        let sample = HistoricalSample {
            temperatures: vec![12.0],
            soil_moisture: None,
        };
        let baseline = Baseline::from_sample(Some(&sample), &ForecastSettings::default());
        assert_eq!(baseline.source, DataSource::Fallback);
    }

    #[test]
    fn test_baseline_uses_history_and_default_moisture() {
        let sample = HistoricalSample {
            temperatures: vec![10.0, 12.0, 14.0],
            soil_moisture: None,
        };
        let baseline = Baseline::from_sample(Some(&sample), &ForecastSettings::default());
        assert_eq!(baseline.source, DataSource::Historical);
        assert_eq!(baseline.mean_temperature, 12.0);
        assert_eq!(baseline.temperature_trend, 2.0);
        assert_eq!(baseline.soil_moisture, 50.0);
    }

    #[test]
    fn test_run_forecast_arrays_have_horizon_length() {
        let settings = ForecastSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let report =
            run_forecast(date(2025, 4, 10), 14, &fallback_baseline(), &settings, &mut rng).unwrap();

        assert_eq!(report.days, 14);
        for len in [
            report.dates.len(),
            report.river_levels.len(),
            report.rainfall.len(),
            report.soil_moisture.len(),
            report.predicted_temperatures.len(),
            report.actual_temperatures.len(),
            report.daily_risk.len(),
        ] {
            assert_eq!(len, 14);
        }
        assert_eq!(report.dates[0], date(2025, 4, 11));
        assert_eq!(report.dates[13], date(2025, 4, 24));
        assert!(report.river_levels.iter().all(|&l| (0.0..=10.0).contains(&l)));
        assert_eq!(report.max_capacity, 10.0);
        assert_eq!(report.current_level, report.river_levels[13]);
    }

    #[test]
    fn test_run_forecast_is_reproducible() {
        let settings = ForecastSettings::default();
        let baseline = fallback_baseline();

        let a = run_forecast(
            date(2025, 7, 1),
            14,
            &baseline,
            &settings,
            &mut ChaCha8Rng::seed_from_u64(77),
        )
        .unwrap();
        let b = run_forecast(
            date(2025, 7, 1),
            14,
            &baseline,
            &settings,
            &mut ChaCha8Rng::seed_from_u64(77),
        )
        .unwrap();

        assert_eq!(a.river_levels, b.river_levels);
        assert_eq!(a.rainfall, b.rainfall);
        assert_eq!(a.actual_temperatures, b.actual_temperatures);
        assert_eq!(a.flood_risk, b.flood_risk);
    }

    #[test]
    fn test_linear_model_without_events_matches_trend() {
        let settings = ForecastSettings {
            seasonal_model: false,
            extreme_events: false,
            ..ForecastSettings::default()
        };
        let baseline = Baseline {
            mean_temperature: 15.0,
            temperature_trend: 0.5,
            soil_moisture: 40.0,
            source: DataSource::Historical,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = run_forecast(date(2025, 1, 15), 3, &baseline, &settings, &mut rng).unwrap();

        assert_eq!(report.predicted_temperatures, vec![15.5, 16.0, 16.5]);
        assert_eq!(report.actual_temperatures, report.predicted_temperatures);
        assert_eq!(report.initial_soil_moisture, 40.0);
        assert_eq!(report.data_source, DataSource::Historical);
    }

    #[test]
    fn test_run_forecast_rejects_zero_horizon() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = run_forecast(
            date(2025, 1, 15),
            0,
            &fallback_baseline(),
            &ForecastSettings::default(),
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), ForecastError::InvalidHorizon);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-03-09").unwrap(), date(2025, 3, 9));
        assert!(matches!(
            parse_date("09/03/2025"),
            Err(ForecastServiceError::InvalidDate(_))
        ));
        assert!(parse_date("2025-02-30").is_err());
    }
}
