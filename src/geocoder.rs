use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::fetch_error::FetchError;
use crate::http_client::UpstreamClient;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

impl GeocodingResult {
    fn matches_country(&self, country: &str) -> bool {
        let country = country.trim();
        self.country
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(country))
            || self
                .country_code
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(country))
    }
}

/// Resolves city names against an Open-Meteo compatible geocoding endpoint.
#[derive(Clone)]
pub struct Geocoder {
    client: UpstreamClient,
    url: String,
}

impl Geocoder {
    pub fn new(client: UpstreamClient, url: String) -> Self {
        Self { client, url }
    }

    /// Coordinates for `city` in `country`, or `None` on any failure.
    pub async fn resolve(&self, city: &str, country: &str) -> Option<Coordinates> {
        match self.try_resolve(city, country).await {
            Ok(coordinates) => Some(coordinates),
            Err(e) => {
                warn!("Geocoding failed for {}, {}: {}", city, country, e);
                None
            }
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn try_resolve(&self, city: &str, country: &str) -> Result<Coordinates, FetchError> {
        let query = [
            ("name", city.trim().to_string()),
            ("count", "10".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        let body = self.client.get_text(&self.url, &query).await?;
        Self::parse_response(&body, city, country)
    }

    /// Picks the first result in the requested country, else the first result.
    fn parse_response(body: &str, city: &str, country: &str) -> Result<Coordinates, FetchError> {
        let response: GeocodingResponse = serde_json::from_str(body)?;
        debug!("Geocoder returned {} candidates", response.results.len());

        let chosen = response
            .results
            .iter()
            .find(|r| r.matches_country(country))
            .or_else(|| response.results.first())
            .ok_or_else(|| FetchError::NotFound(format!("{city}, {country}")))?;

        if !chosen.latitude.is_finite()
            || !chosen.longitude.is_finite()
            || !(-90.0..=90.0).contains(&chosen.latitude)
            || !(-180.0..=180.0).contains(&chosen.longitude)
        {
            return Err(FetchError::Malformed(format!(
                "coordinates out of range for {}: {}, {}",
                chosen.name, chosen.latitude, chosen.longitude
            )));
        }

        debug!(
            "Resolved {} to {:.4}, {:.4}",
            chosen.name, chosen.latitude, chosen.longitude
        );
        Ok(Coordinates {
            latitude: chosen.latitude,
            longitude: chosen.longitude,
        })
    }
}
