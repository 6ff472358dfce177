//! River-soil process functions.
//!
//! Pure functions for each sub-step of the daily transition. Levels are in
//! metres, rainfall in millimetres, moisture in percent.
use super::constants::{
    HydrologyConfig, EVAPORATION_RATE, HIGH_HEAD_FACTOR, HIGH_HEAD_RATIO, MID_HEAD_FACTOR,
    MID_HEAD_RATIO, RAIN_MOISTURE_GAIN, RUNOFF_BOUNDS, WARNING_RATIO,
};
use crate::models::FloodWarning;

/// Step 1: Fraction of rainfall that reaches the river.
///
/// Wetter soil sheds more water. Clamped to [0.1, 0.9] for any input.
pub fn runoff_coefficient(soil_moisture: f64) -> f64 {
    (soil_moisture / 100.0).clamp(RUNOFF_BOUNDS.0, RUNOFF_BOUNDS.1)
}

/// Step 2: Inflow to the river [m].
///
/// Rain days route rainfall through the runoff coefficient; dry days get a
/// baseflow proportional to soil moisture.
pub fn inflow(rainfall: f64, soil_moisture: f64, config: &HydrologyConfig) -> f64 {
    if rainfall > 0.0 {
        rainfall * runoff_coefficient(soil_moisture) * config.inflow_scale
    } else {
        soil_moisture.max(0.0) * config.baseflow_rate
    }
}

/// Acceleration of outflow at high head.
pub fn outflow_factor(level: f64, max_capacity: f64) -> f64 {
    if level > HIGH_HEAD_RATIO * max_capacity {
        HIGH_HEAD_FACTOR
    } else if level > MID_HEAD_RATIO * max_capacity {
        MID_HEAD_FACTOR
    } else {
        1.0
    }
}

/// Step 3: Outflow from the river [m].
pub fn outflow(level: f64, max_capacity: f64, config: &HydrologyConfig) -> f64 {
    level * config.decay_rate * outflow_factor(level, max_capacity)
}

/// Step 4: Water balance, clamped to `[level_floor, max_capacity]`.
pub fn next_level(
    level: f64,
    inflow: f64,
    outflow: f64,
    max_capacity: f64,
    config: &HydrologyConfig,
) -> f64 {
    let floor = config.level_floor.min(max_capacity);
    (level + inflow - outflow).clamp(floor, max_capacity)
}

/// Step 5: Soil moisture after rain infiltration and evaporation.
pub fn next_soil_moisture(moisture: f64, rainfall: f64, temperature: f64) -> f64 {
    let evaporation = (temperature * EVAPORATION_RATE).max(0.0);
    let change = rainfall * RAIN_MOISTURE_GAIN - evaporation;
    (moisture + change).clamp(0.0, 100.0)
}

/// Step 6: Risk for a river level, using fractions of capacity.
pub fn classify_risk(level: f64, max_capacity: f64) -> FloodWarning {
    if level >= max_capacity {
        FloodWarning::Flooding
    } else if level >= WARNING_RATIO * max_capacity {
        FloodWarning::Warning(level)
    } else {
        FloodWarning::NoRisk
    }
}
