pub mod forecast_service;

pub use forecast_service::{
    DataSource, ForecastRequest, ForecastService, ForecastServiceError, SimulationReport,
};
