use crate::models::HistoricalSample;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("Insufficient data: need at least {required} values, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("Series contains a non-finite value at index {0}")]
    NonFinite(usize),
}

/// Summary statistics derived from a historical sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalStats {
    pub mean_temperature: f64,
    /// OLS slope of temperature per sample index.
    pub temperature_trend: f64,
    pub mean_soil_moisture: Option<f64>,
    pub sample_count: usize,
}

impl HistoricalStats {
    /// Computes temperature mean and trend, and the moisture mean when a
    /// non-empty moisture series is present.
    pub fn from_sample(sample: &HistoricalSample) -> Result<Self, StatsError> {
        let mean_temperature = mean(&sample.temperatures)?;
        let temperature_trend = linear_trend(&sample.temperatures)?;

        let mean_soil_moisture = match sample.soil_moisture.as_deref() {
            Some(values) if !values.is_empty() => Some(mean(values)?),
            _ => None,
        };

        Ok(Self {
            mean_temperature,
            temperature_trend,
            mean_soil_moisture,
            sample_count: sample.temperatures.len(),
        })
    }
}

fn check_finite(values: &[f64]) -> Result<(), StatsError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(StatsError::NonFinite(index)),
        None => Ok(()),
    }
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    check_finite(values)?;

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Ordinary-least-squares slope of `values` against their 1-based index.
///
/// The index stands in for time, so callers must pass evenly spaced,
/// time-ordered values. Fewer than two points leave the slope undefined.
pub fn linear_trend(values: &[f64]) -> Result<f64, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: values.len(),
        });
    }
    check_finite(values)?;

    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = (i + 1) as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: values.len(),
        });
    }

    Ok((n * sum_xy - sum_x * sum_y) / denominator)
}
