use serde::Deserialize;

use super::Geometry;

// Requests are plain query strings, only the response is modelled.

/// Raw response from the geocoding service.
#[derive(Debug, Deserialize)]
pub struct Response {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

/// Raw geocoding match.
#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}
