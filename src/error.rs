//! error.rs
//! Errores recuperables del servicio y su traducción a respuestas HTTP.
//! Ninguno tumba el proceso: el cliente recibe un JSON con `error` y `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    /// El proveedor no devolvió resultado (o la caja envolvente está vacía)
    #[error("location not found: {0}")]
    LocationNotFound(String),
    /// Fallo de red o del proveedor
    #[error("geocoder unavailable: {0}")]
    GeocodeUnavailable(String),
}

impl From<reqwest::Error> for GeoError {
    fn from(e: reqwest::Error) -> Self {
        GeoError::GeocodeUnavailable(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Geo(GeoError::LocationNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Geo(GeoError::GeocodeUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Geo(GeoError::LocationNotFound(_)) => "location_not_found",
            ApiError::Geo(GeoError::GeocodeUnavailable(_)) => "geocode_unavailable",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.code(), "message": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
