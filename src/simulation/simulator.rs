use tracing::{debug, instrument};

use super::constants::HydrologyConfig;
use super::processes;
use crate::models::{DayOutcome, FloodWarning, RiverState, SoilCondition, WeatherSample};

/// Day-by-day river and soil state machine.
///
/// Deterministic: all randomness belongs to the weather and forecast stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiverSimulator {
    config: HydrologyConfig,
}

impl RiverSimulator {
    pub fn new(config: HydrologyConfig) -> Self {
        Self { config }
    }

    /// Advances one day and returns the successor states with the new day's risk.
    pub fn step(
        &self,
        river: &RiverState,
        soil: &SoilCondition,
        rainfall: f64,
        temperature: f64,
    ) -> (RiverState, SoilCondition, FloodWarning) {
        let rainfall = rainfall.max(0.0);

        let inflow = processes::inflow(rainfall, soil.moisture, &self.config);
        let outflow = processes::outflow(river.current_level, river.max_capacity, &self.config);
        let level = processes::next_level(
            river.current_level,
            inflow,
            outflow,
            river.max_capacity,
            &self.config,
        );

        let moisture = processes::next_soil_moisture(soil.moisture, rainfall, temperature);

        let next_river = RiverState {
            current_level: level,
            max_capacity: river.max_capacity,
            soil_moisture: moisture,
        };
        let warning = processes::classify_risk(level, river.max_capacity);

        (next_river, SoilCondition { moisture }, warning)
    }

    /// Runs the model over paired weather and temperature inputs.
    ///
    /// Stops at the shorter of the two sequences. Each day's temperature comes
    /// from `temperatures`; the weather sample contributes rainfall only.
    #[instrument(skip_all, fields(weather_days = weather.len(), temperature_days = temperatures.len()))]
    pub fn simulate(
        &self,
        initial_river: RiverState,
        initial_soil: SoilCondition,
        weather: &[WeatherSample],
        temperatures: &[f64],
    ) -> Vec<DayOutcome> {
        let mut river = initial_river;
        let mut soil = initial_soil;
        let mut outcomes = Vec::with_capacity(weather.len().min(temperatures.len()));

        for (day, (sample, &temperature)) in weather.iter().zip(temperatures).enumerate() {
            let (next_river, next_soil, warning) =
                self.step(&river, &soil, sample.rainfall_mm, temperature);

            debug!(
                day = day + 1,
                rainfall_mm = sample.rainfall_mm,
                temperature_c = temperature,
                level = next_river.current_level,
                soil_moisture = next_soil.moisture,
                warning = %warning,
                "Simulated day"
            );

            outcomes.push(DayOutcome {
                river: next_river,
                warning,
            });
            river = next_river;
            soil = next_soil;
        }

        outcomes
    }
}
