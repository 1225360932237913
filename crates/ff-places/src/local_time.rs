//! Local wall-clock time at a coordinate, via the time-zone service.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    api_interfaces::time_zone::Response,
    constants::{API_KEY_PARAM, DEFAULT_TIME_ZONE_URL},
    error::GetError,
    geo::Coordinate,
    util, ApiKey,
};

#[derive(Clone, Debug, PartialEq)]
pub struct LocalTime {
    pub time_zone_id: Option<String>,
    pub time: DateTime<FixedOffset>,
}

impl LocalTime {
    pub fn utc_now() -> Self {
        Self {
            time_zone_id: Some("UTC".to_string()),
            time: Utc::now().fixed_offset(),
        }
    }

    /// Shift `now` by the raw and daylight-saving offsets, both in seconds.
    pub fn from_offsets(
        now: DateTime<Utc>,
        raw_offset: i32,
        dst_offset: i32,
        time_zone_id: Option<String>,
    ) -> Option<Self> {
        let offset = FixedOffset::east_opt(raw_offset.checked_add(dst_offset)?)?;
        Some(Self {
            time_zone_id,
            time: now.with_timezone(&offset),
        })
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%Y-%m-%d %H:%M:%S"))?;
        if let Some(zone) = &self.time_zone_id {
            write!(f, " ({zone})")?;
        }
        Ok(())
    }
}

pub async fn get(
    client: &reqwest::Client,
    api_key: &ApiKey,
    endpoint: Option<&str>,
    location: &Coordinate,
) -> Result<LocalTime, GetError> {
    let now = Utc::now();
    let query = [
        ("location", location.to_query_value()),
        ("timestamp", now.timestamp().to_string()),
        (API_KEY_PARAM, api_key.get().to_string()),
    ];
    let response: Response =
        util::get_json(client, endpoint.unwrap_or(DEFAULT_TIME_ZONE_URL), &query).await?;
    util::check_status(&response.status, response.error_message.as_deref())?;
    let raw_offset = response
        .raw_offset
        .ok_or_else(|| GetError::Malformed("missing rawOffset".to_string()))?;
    let dst_offset = response.dst_offset.unwrap_or(0);
    LocalTime::from_offsets(now, raw_offset, dst_offset, response.time_zone_id).ok_or_else(|| {
        GetError::Malformed(format!(
            "offset {raw_offset}+{dst_offset} seconds is out of range"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use httpmock::prelude::*;
    use serde_json::json;

    const FAKE_API_KEY: &str = "fake-api-key";

    #[test]
    fn from_offsets_applies_raw_and_dst() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 20, 0, 0).unwrap();

        let local =
            LocalTime::from_offsets(now, -28800, 3600, Some("America/Los_Angeles".to_string()))
                .unwrap();

        assert_eq!(local.time.offset().local_minus_utc(), -25200);
        assert_eq!(
            local.to_string(),
            "2024-07-01 13:00:00 (America/Los_Angeles)"
        );
    }

    #[test]
    fn from_offsets_rejects_absurd_offsets() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 20, 0, 0).unwrap();

        assert!(LocalTime::from_offsets(now, 200_000, 0, None).is_none());
    }

    #[tokio::test]
    async fn get_success() {
        // Arrange
        let server = MockServer::start_async().await;
        let time_zone_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/timezone/json")
                    .query_param("location", "37.7577,-122.4376")
                    .query_param_exists("timestamp")
                    .query_param(API_KEY_PARAM, FAKE_API_KEY);
                then.status(200).json_body(json!({
                    "status": "OK",
                    "rawOffset": -28800,
                    "dstOffset": 3600,
                    "timeZoneId": "America/Los_Angeles"
                }));
            })
            .await;
        let url = server.url("/timezone/json");
        let client = reqwest::Client::new();
        let api_key = ApiKey::from_raw(FAKE_API_KEY).unwrap();

        // Act
        let local = get(
            &client,
            &api_key,
            Some(&url),
            &Coordinate::new(37.7577, -122.4376),
        )
        .await;

        // Assert
        let local = local.unwrap();
        assert_eq!(local.time_zone_id.as_deref(), Some("America/Los_Angeles"));
        assert_eq!(local.time.offset().local_minus_utc(), -25200);
        time_zone_mock.assert();
    }

    #[tokio::test]
    async fn get_missing_offset() {
        // Arrange
        let server = MockServer::start_async().await;
        let time_zone_mock = server
            .mock_async(|when, then| {
                when.path("/timezone/json");
                then.status(200).json_body(json!({ "status": "OK" }));
            })
            .await;
        let url = server.url("/timezone/json");
        let client = reqwest::Client::new();
        let api_key = ApiKey::from_raw(FAKE_API_KEY).unwrap();

        // Act
        let local = get(&client, &api_key, Some(&url), &Coordinate::new(0.0, 0.0)).await;

        // Assert
        assert!(matches!(local.unwrap_err(), GetError::Malformed(_)));
        time_zone_mock.assert();
    }
}
