use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::capture::CaptureError;
use crate::gateway::GatewayError;
use crate::geocode::GeocodeError;
use crate::itinerary::ItineraryError;

/// Any failure a route can report. Rendered as a one-line JSON notification.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Itinerary(#[from] ItineraryError),
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Capture(e) => match e {
                CaptureError::DeviceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "device_unavailable"),
                CaptureError::NotStreaming => (StatusCode::CONFLICT, "not_streaming"),
                CaptureError::CaptureInProgress => (StatusCode::CONFLICT, "capture_in_progress"),
                CaptureError::Frame(_) | CaptureError::Encode(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "capture_failed")
                }
            },
            ApiError::Gateway(e) => match e {
                GatewayError::Config => (StatusCode::SERVICE_UNAVAILABLE, "config_error"),
                GatewayError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                GatewayError::Remote(_) => (StatusCode::BAD_GATEWAY, "remote_error"),
                GatewayError::Parse(_) => (StatusCode::BAD_GATEWAY, "parse_error"),
            },
            ApiError::Geocode(e) => match e {
                GeocodeError::InvalidCoordinates { .. } => (StatusCode::BAD_REQUEST, "invalid_coordinates"),
                GeocodeError::CountryNotFound => (StatusCode::NOT_FOUND, "country_not_found"),
                GeocodeError::Remote(_) => (StatusCode::BAD_GATEWAY, "remote_error"),
            },
            ApiError::Itinerary(e) => match e {
                ItineraryError::UnsupportedFormat(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_format"),
                ItineraryError::Empty => (StatusCode::BAD_REQUEST, "empty_itinerary"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = self
            .to_string()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        warn!(%status, kind, "{}", message);
        (status, Json(json!({ "error": message, "kind": kind }))).into_response()
    }
}
