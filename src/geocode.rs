use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::GeocodeConfig;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("no country found for this location")]
    CountryNotFound,
    #[error("reverse geocoding failed: {0}")]
    Remote(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReverseGeocodeResponse {
    country_name: Option<String>,
}

/// Client for the BigDataCloud reverse-geocode endpoint.
pub struct ReverseGeocoder {
    client: Client,
    base_url: String,
    locality_language: String,
}

impl ReverseGeocoder {
    pub fn new(config: &GeocodeConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            locality_language: config.locality_language.clone(),
        }
    }

    pub async fn country_for(&self, coordinates: Coordinates) -> Result<String, GeocodeError> {
        if !coordinates.is_valid() {
            return Err(GeocodeError::InvalidCoordinates {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
            });
        }

        let url = format!("{}/data/reverse-geocode-client", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("localityLanguage", self.locality_language.clone()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("Error getting location: {}", e);
                GeocodeError::Remote(e.to_string())
            })?;

        let body: ReverseGeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Remote(e.to_string()))?;

        let country = body
            .country_name
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(GeocodeError::CountryNotFound)?;
        info!("Location resolved to {}", country);
        Ok(country)
    }
}
