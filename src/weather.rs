use rand::Rng;
use tracing::debug;

use crate::models::WeatherSample;

/// Probability of an extreme event in each tail of the overlay draw.
pub const EXTREME_EVENT_PROBABILITY: f64 = 0.05;

/// Rain probability and maximum daily amount for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRainfall {
    pub rain_chance: f64,
    pub rain_max_mm: f64,
}

const fn month(rain_chance: f64, rain_max_mm: f64) -> MonthlyRainfall {
    MonthlyRainfall {
        rain_chance,
        rain_max_mm,
    }
}

/// Simplified northern-hemisphere regime: dry winter, wet late spring and summer.
pub const MONTHLY_RAINFALL: [MonthlyRainfall; 12] = [
    month(0.30, 8.0),  // Jan
    month(0.30, 8.0),  // Feb
    month(0.40, 12.0), // Mar
    month(0.50, 18.0), // Apr
    month(0.60, 25.0), // May
    month(0.65, 30.0), // Jun
    month(0.55, 28.0), // Jul
    month(0.50, 25.0), // Aug
    month(0.45, 20.0), // Sep
    month(0.40, 15.0), // Oct
    month(0.35, 12.0), // Nov
    month(0.30, 10.0), // Dec
];

/// Month (1-12) for a 1-based day of year, using 30-day buckets.
///
/// Days past 360 fold into December and days past 365 wrap into the next year.
pub fn month_for_day(day_of_year: u32) -> u32 {
    let day = day_of_year.max(1);
    (((day - 1) % 365) / 30 + 1).clamp(1, 12)
}

pub fn rainfall_profile(day_of_year: u32) -> MonthlyRainfall {
    MONTHLY_RAINFALL[(month_for_day(day_of_year) - 1) as usize]
}

/// Rare event layered on top of a generated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtremeEvent {
    Storm { extra_rainfall_mm: f64 },
    HeatWave { extra_temperature_c: f64 },
}

/// Draws `days` samples starting at `start_day_of_year`.
///
/// Temperatures are left at 0.0; the forecast stage owns them.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    days: usize,
    start_day_of_year: u32,
) -> Vec<WeatherSample> {
    (0..days)
        .map(|offset| {
            let profile = rainfall_profile(start_day_of_year.saturating_add(offset as u32));
            let rainfall = if rng.gen::<f64>() < profile.rain_chance {
                rng.gen_range(0.0..profile.rain_max_mm)
            } else {
                0.0
            };
            WeatherSample::new(rainfall, 0.0)
        })
        .collect()
}

/// Applies at most one extreme event to `sample` from a single uniform draw.
///
/// The low tail produces a storm (+50..100 mm) and the high tail a heat
/// excursion (+5..15 °C).
pub fn apply_extreme_event<R: Rng + ?Sized>(
    sample: &mut WeatherSample,
    rng: &mut R,
) -> Option<ExtremeEvent> {
    let roll: f64 = rng.gen();

    if roll < EXTREME_EVENT_PROBABILITY {
        let extra_rainfall_mm = rng.gen_range(50.0..=100.0);
        sample.rainfall_mm += extra_rainfall_mm;
        debug!(extra_rainfall_mm, "Storm burst applied");
        Some(ExtremeEvent::Storm { extra_rainfall_mm })
    } else if roll >= 1.0 - EXTREME_EVENT_PROBABILITY {
        let extra_temperature_c = rng.gen_range(5.0..=15.0);
        sample.temperature_c += extra_temperature_c;
        debug!(extra_temperature_c, "Heat excursion applied");
        Some(ExtremeEvent::HeatWave {
            extra_temperature_c,
        })
    } else {
        None
    }
}
