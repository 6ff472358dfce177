use std::f64::consts::TAU;

use rand::Rng;

use crate::models::ForecastPoint;

/// Amplitude of the yearly temperature cycle in °C.
pub const SEASONAL_AMPLITUDE: f64 = 5.0;
/// Half-width of the uniform day-to-day perturbation in °C.
pub const DAILY_VARIATION: f64 = 2.0;
/// Half-width of the uniform weather-system perturbation in °C.
pub const WEATHER_SYSTEM_VARIATION: f64 = 1.5;

const DAYS_PER_YEAR: u32 = 365;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("Forecast horizon must be at least one day")]
    InvalidHorizon,
}

/// Pure linear extrapolation: `mean + slope * i` for `i` in `1..=horizon`.
pub fn linear_forecast(
    mean: f64,
    slope: f64,
    horizon: usize,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    if horizon == 0 {
        return Err(ForecastError::InvalidHorizon);
    }

    Ok((1..=horizon)
        .map(|day| ForecastPoint {
            day,
            temperature_c: mean + slope * day as f64,
        })
        .collect())
}

/// Linear trend plus a yearly sinusoid and two independent uniform
/// perturbations, all drawn fresh for every day.
///
/// `anchor_day_of_year` is the day of year of the base date; day `i` of the
/// forecast sits at phase `(anchor + i) mod 365`.
pub fn seasonal_forecast<R: Rng + ?Sized>(
    mean: f64,
    slope: f64,
    horizon: usize,
    anchor_day_of_year: u32,
    rng: &mut R,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    let mut points = linear_forecast(mean, slope, horizon)?;

    for point in &mut points {
        let phase = (anchor_day_of_year as u64 + point.day as u64) % DAYS_PER_YEAR as u64;
        let seasonal = SEASONAL_AMPLITUDE * (TAU * phase as f64 / DAYS_PER_YEAR as f64).sin();
        let daily = rng.gen_range(-DAILY_VARIATION..=DAILY_VARIATION);
        let system = rng.gen_range(-WEATHER_SYSTEM_VARIATION..=WEATHER_SYSTEM_VARIATION);

        point.temperature_c += seasonal + daily + system;
    }

    Ok(points)
}

/// Temperature column of a forecast.
pub fn temperatures(points: &[ForecastPoint]) -> Vec<f64> {
    points.iter().map(|p| p.temperature_c).collect()
}
