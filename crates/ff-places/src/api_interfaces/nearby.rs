use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::Geometry;
use crate::price::PriceLevel;

/// Raw page from the nearby-search service.
#[derive(Debug, Deserialize)]
pub struct Response {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "usable_candidates")]
    pub results: Vec<PlaceCandidate>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Raw search result, before distance and open-now enrichment.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PlaceCandidate {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "lenient_price_level")]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Keep every result that has the fields a restaurant needs and drop the rest,
/// so one malformed entry costs only itself.
fn usable_candidates<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<PlaceCandidate>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<PlaceCandidate>(item) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                warn!(error = %e, "skipping malformed search result");
                None
            }
        })
        .collect())
}

/// Integers 0-4 pass through; any other number is treated as the top level.
/// Non-numeric values count as absent.
fn lenient_price_level<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u8>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => Some(
            number
                .as_u64()
                .and_then(|level| u8::try_from(level).ok())
                .filter(|level| *level <= PriceLevel::MAX)
                .unwrap_or(PriceLevel::MAX),
        ),
        _ => None,
    })
}
