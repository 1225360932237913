use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{constants::STATUS_OK, error::GetError};

pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .gzip(true)
        .brotli(true)
        .timeout(timeout)
        .build()
}

/// Issue a GET with the given query and parse the JSON body.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, GetError> {
    let response = client.get(url).query(query).send().await?;
    if !response.status().is_success() {
        return Err(GetError::ResponseError(response.status()));
    }
    let body = response.text().await.map_err(GetError::ResponseBodyError)?;
    Ok(serde_json::from_str(&body)?)
}

/// Map a non-OK envelope status to an error.
pub fn check_status(status: &str, message: Option<&str>) -> Result<(), GetError> {
    if status == STATUS_OK {
        return Ok(());
    }
    Err(GetError::ApiStatus {
        status: status.to_string(),
        message: message.map(str::to_string),
    })
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
