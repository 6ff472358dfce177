use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::simulation::HydrologyConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub geocoding_url: String,
    pub historical_url: String,
    pub simulation_days: usize,
    pub max_capacity: f64,
    pub initial_river_level: f64,
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_temperature: f64,
    pub default_soil_moisture: f64,
    pub history_years: u32,
    pub history_window_days: u64,
    pub http_timeout_secs: u64,
    pub http_max_retries: usize,
    pub seasonal_model: bool,
    pub extreme_events: bool,
}

/// Settings the forecast service needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    pub simulation_days: usize,
    pub max_capacity: f64,
    pub initial_river_level: f64,
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_temperature: f64,
    pub default_soil_moisture: f64,
    pub seasonal_model: bool,
    pub extreme_events: bool,
    pub hydrology: HydrologyConfig,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            simulation_days: 14,
            max_capacity: 10.0,
            initial_river_level: 2.0,
            default_latitude: 47.5,
            default_longitude: 19.0,
            default_temperature: 20.0,
            default_soil_moisture: 50.0,
            seasonal_model: true,
            extreme_events: true,
            hydrology: HydrologyConfig::default(),
        }
    }
}

fn var_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ForecastSettings::default();

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: var_or("SERVER_PORT", 8080),
            geocoding_url: env::var("GEOCODING_URL").unwrap_or_else(|_| {
                "https://geocoding-api.open-meteo.com/v1/search".to_string()
            }),
            historical_url: env::var("HISTORICAL_URL").unwrap_or_else(|_| {
                "https://archive-api.open-meteo.com/v1/archive".to_string()
            }),
            simulation_days: var_or("SIMULATION_DAYS", defaults.simulation_days),
            max_capacity: var_or("MAX_CAPACITY", defaults.max_capacity),
            initial_river_level: var_or("INITIAL_RIVER_LEVEL", defaults.initial_river_level),
            default_latitude: var_or("DEFAULT_LATITUDE", defaults.default_latitude),
            default_longitude: var_or("DEFAULT_LONGITUDE", defaults.default_longitude),
            default_temperature: var_or("DEFAULT_TEMPERATURE", defaults.default_temperature),
            default_soil_moisture: var_or("DEFAULT_SOIL_MOISTURE", defaults.default_soil_moisture),
            history_years: var_or("HISTORY_YEARS", 5),
            history_window_days: var_or("HISTORY_WINDOW_DAYS", 3),
            http_timeout_secs: var_or("HTTP_TIMEOUT_SECS", 30),
            http_max_retries: var_or("HTTP_MAX_RETRIES", 2),
            seasonal_model: var_or("SEASONAL_MODEL", defaults.seasonal_model),
            extreme_events: var_or("EXTREME_EVENTS", defaults.extreme_events),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation_days == 0 {
            return Err(ConfigError::Invalid {
                name: "SIMULATION_DAYS",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.max_capacity.is_finite() || self.max_capacity <= 0.0 {
            return Err(ConfigError::Invalid {
                name: "MAX_CAPACITY",
                reason: format!("must be a positive number, got {}", self.max_capacity),
            });
        }
        let floats = [
            ("INITIAL_RIVER_LEVEL", self.initial_river_level),
            ("DEFAULT_LATITUDE", self.default_latitude),
            ("DEFAULT_LONGITUDE", self.default_longitude),
            ("DEFAULT_TEMPERATURE", self.default_temperature),
            ("DEFAULT_SOIL_MOISTURE", self.default_soil_moisture),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    name,
                    reason: format!("must be a finite number, got {value}"),
                });
            }
        }
        if self.history_years == 0 {
            return Err(ConfigError::Invalid {
                name: "HISTORY_YEARS",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn forecast_settings(&self) -> ForecastSettings {
        ForecastSettings {
            simulation_days: self.simulation_days,
            max_capacity: self.max_capacity,
            initial_river_level: self.initial_river_level,
            default_latitude: self.default_latitude,
            default_longitude: self.default_longitude,
            default_temperature: self.default_temperature,
            default_soil_moisture: self.default_soil_moisture,
            seasonal_model: self.seasonal_model,
            extreme_events: self.extreme_events,
            hydrology: HydrologyConfig::default(),
        }
    }
}
