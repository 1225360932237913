//! Postal code to coordinate resolution.

use crate::{
    api_interfaces::geocode::Response,
    constants::{API_KEY_PARAM, DEFAULT_GEOCODE_URL},
    error::GetError,
    geo::Coordinate,
    util, ApiKey,
};

/// Resolve `postal_code` to the coordinate of the first geocoding match.
pub async fn get(
    client: &reqwest::Client,
    api_key: &ApiKey,
    endpoint: Option<&str>,
    postal_code: &str,
) -> Result<Coordinate, GetError> {
    let query = [
        ("address", postal_code.to_string()),
        (API_KEY_PARAM, api_key.get().to_string()),
    ];
    let response: Response =
        util::get_json(client, endpoint.unwrap_or(DEFAULT_GEOCODE_URL), &query).await?;
    util::check_status(&response.status, response.error_message.as_deref())?;
    response
        .results
        .into_iter()
        .next()
        .map(|result| Coordinate::from(result.geometry.location))
        .ok_or(GetError::EmptyResults)
}
