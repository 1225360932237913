use serde::Deserialize;

/// Raw response from the time-zone service. Offsets are in seconds.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub raw_offset: Option<i32>,
    #[serde(default)]
    pub dst_offset: Option<i32>,
    #[serde(default)]
    pub time_zone_id: Option<String>,
}
