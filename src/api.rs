use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::services::{
    DataSource, ForecastRequest, ForecastService, ForecastServiceError, SimulationReport,
};

#[derive(Clone)]
pub struct AppState {
    pub forecast_service: ForecastService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForecastQuery {
    /// Base date, YYYY-MM-DD. The forecast starts the following day.
    pub date: String,
    pub city: String,
    pub country: String,
    /// Optional seed to reproduce a previous run.
    pub seed: Option<u64>,
}

impl From<ForecastQuery> for ForecastRequest {
    fn from(query: ForecastQuery) -> Self {
        ForecastRequest {
            date: query.date,
            city: query.city,
            country: query.country,
            seed: query.seed,
            days: None,
        }
    }
}

impl IntoResponse for ForecastServiceError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_forecast),
    components(schemas(HealthResponse, ErrorResponse, SimulationReport, DataSource)),
    tags((name = "flood-forecast", description = "River flood risk forecasts"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/forecast", get(get_forecast))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "flood-forecast",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    tag = "flood-forecast",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Simulated flood risk for the forecast horizon", body = SimulationReport),
        (status = 400, description = "Invalid date or horizon", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(date = %query.date, city = %query.city, country = %query.country))]
async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<SimulationReport>, ForecastServiceError> {
    debug!("Forecast requested");
    let request = ForecastRequest::from(query);

    let report = state
        .forecast_service
        .forecast(&request)
        .await
        .map_err(|e| {
            warn!("Rejected forecast request for {}, {}: {}", request.city, request.country, e);
            e
        })?;

    info!(
        "Served {}-day forecast for {}, {}: {}",
        report.days, report.city, report.country, report.flood_risk
    );
    Ok(Json(report))
}
