//! Hydrology coefficients for the river-soil model.
//!
//! These are heuristic values, not derived from hydraulic law. Only one set is
//! used per run; `Default` is the standard calibration.

// -- Fixed thresholds --

/// Runoff coefficient bounds: (min, max).
pub const RUNOFF_BOUNDS: (f64, f64) = (0.1, 0.9);

/// Fill ratio above which outflow accelerates by `HIGH_HEAD_FACTOR`.
pub const HIGH_HEAD_RATIO: f64 = 0.8;
pub const HIGH_HEAD_FACTOR: f64 = 1.5;

/// Fill ratio above which outflow accelerates by `MID_HEAD_FACTOR`.
pub const MID_HEAD_RATIO: f64 = 0.5;
pub const MID_HEAD_FACTOR: f64 = 1.2;

/// Fill ratio at or above which a day is classified as a warning.
pub const WARNING_RATIO: f64 = 0.8;

/// Moisture gained per millimetre of rain [%/mm].
pub const RAIN_MOISTURE_GAIN: f64 = 0.1;

/// Evaporation per degree Celsius [%/°C].
pub const EVAPORATION_RATE: f64 = 0.03;

/// Tunable coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrologyConfig {
    /// Drainage-area scale turning runoff millimetres into metres of level.
    pub inflow_scale: f64,
    /// Dry-day inflow per percent of soil moisture [m/%].
    pub baseflow_rate: f64,
    /// Fraction of the current level drained per day.
    pub decay_rate: f64,
    /// Lowest level the river can reach [m].
    pub level_floor: f64,
}

impl HydrologyConfig {
    /// Standard calibration: 0.05 inflow scale, 0.05 daily decay, floor at 0 m.
    pub const STANDARD: HydrologyConfig = HydrologyConfig {
        inflow_scale: 0.05,
        baseflow_rate: 0.001,
        decay_rate: 0.05,
        level_floor: 0.0,
    };
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}
