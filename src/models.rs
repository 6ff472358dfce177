use std::fmt;

use serde::Serialize;

// Domain values shared by the statistics, forecast, weather and simulation stages

/// One day of atmospheric input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherSample {
    pub rainfall_mm: f64,
    pub temperature_c: f64,
}

impl WeatherSample {
    /// Negative rainfall is clamped to zero.
    pub fn new(rainfall_mm: f64, temperature_c: f64) -> Self {
        Self {
            rainfall_mm: rainfall_mm.max(0.0),
            temperature_c,
        }
    }
}

/// Soil moisture in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilCondition {
    pub moisture: f64,
}

impl SoilCondition {
    pub fn new(moisture: f64) -> Self {
        Self {
            moisture: moisture.clamp(0.0, 100.0),
        }
    }
}

/// Hydrological state of the river on a given day.
///
/// `soil_moisture` mirrors the soil condition the state was produced with so a
/// single day can be reported without the paired `SoilCondition`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiverState {
    pub current_level: f64,
    pub max_capacity: f64,
    pub soil_moisture: f64,
}

impl RiverState {
    /// Builds a state with the level clamped into `[0, max_capacity]`.
    pub fn new(current_level: f64, max_capacity: f64, soil_moisture: f64) -> Self {
        let max_capacity = max_capacity.max(0.0);
        Self {
            current_level: current_level.clamp(0.0, max_capacity),
            max_capacity,
            soil_moisture: soil_moisture.clamp(0.0, 100.0),
        }
    }
}

/// Flood risk classification for a single day or a whole horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "level")]
pub enum FloodWarning {
    NoRisk,
    /// Carries the river level that triggered the warning.
    Warning(f64),
    Flooding,
}

impl FloodWarning {
    /// Stable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            FloodWarning::NoRisk => "NoRisk",
            FloodWarning::Warning(_) => "Warning",
            FloodWarning::Flooding => "Flooding",
        }
    }

    pub fn is_flooding(&self) -> bool {
        matches!(self, FloodWarning::Flooding)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, FloodWarning::Warning(_))
    }
}

impl fmt::Display for FloodWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloodWarning::NoRisk => write!(f, "No risk"),
            FloodWarning::Warning(level) => write!(f, "Warning ({level:.2} m)"),
            FloodWarning::Flooding => write!(f, "Flooding"),
        }
    }
}

/// Archived readings gathered from the yearly windows, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoricalSample {
    pub temperatures: Vec<f64>,
    pub soil_moisture: Option<Vec<f64>>,
}

/// One predicted future day. `day` is the offset from the base date, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub day: usize,
    pub temperature_c: f64,
}

/// Result of simulating a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayOutcome {
    pub river: RiverState,
    pub warning: FloodWarning,
}
