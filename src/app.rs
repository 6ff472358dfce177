use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::geocoder::Geocoder;
use crate::historical_fetcher::HistoricalDataFetcher;
use crate::http_client::UpstreamClient;
use crate::services::ForecastService;

/// Application with its spawned HTTP server
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Build the service graph from configuration
    pub fn forecast_service(config: &Config) -> Result<ForecastService, Box<dyn std::error::Error>> {
        let client = UpstreamClient::new(config.http_timeout(), config.http_max_retries)?;

        let geocoder = Geocoder::new(client.clone(), config.geocoding_url.clone());
        let historical = HistoricalDataFetcher::new(
            client,
            config.historical_url.clone(),
            config.history_years,
            config.history_window_days,
        );

        Ok(ForecastService::new(
            geocoder,
            historical,
            config.forecast_settings(),
        ))
    }

    /// Build and start the application
    ///
    /// Creates the upstream clients and forecast service, then spawns the
    /// Axum server.
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let forecast_service = Self::forecast_service(&config)?;
        info!(
            "Forecast horizon: {} days, river capacity: {:.1} m",
            config.simulation_days, config.max_capacity
        );

        let app_state = AppState { forecast_service };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    /// Run until the server stops
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
