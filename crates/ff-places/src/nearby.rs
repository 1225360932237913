//! Nearby-search requests, one page at a time.

use crate::{
    api_interfaces::nearby::Response,
    constants::{API_KEY_PARAM, DEFAULT_NEARBY_SEARCH_URL, METERS_PER_MILE, STATUS_ZERO_RESULTS},
    error::GetError,
    geo::Coordinate,
    price::PriceLevel,
    search::SearchRequest,
    util, ApiKey,
};

const PLACE_TYPE: &str = "restaurant";
/// Smallest radius sent, so a tiny radius never rounds to zero.
const MIN_RADIUS_METERS: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub enum NearbyQuery {
    /// The first page of a search.
    Initial {
        location: Coordinate,
        radius_meters: f64,
        keyword: Option<String>,
        price_level: Option<PriceLevel>,
    },
    /// A follow-up page addressed only by its continuation token.
    NextPage(String),
}

pub fn radius_meters(radius_miles: f64) -> f64 {
    radius_miles * METERS_PER_MILE
}

impl NearbyQuery {
    pub fn initial(request: &SearchRequest, origin: Coordinate) -> Self {
        NearbyQuery::Initial {
            location: origin,
            radius_meters: radius_meters(request.radius_miles()),
            keyword: request.search_term().map(str::to_string),
            price_level: request.price_level(),
        }
    }

    pub fn to_params(&self, api_key: &ApiKey) -> Vec<(&'static str, String)> {
        let mut params = match self {
            NearbyQuery::Initial {
                location,
                radius_meters,
                keyword,
                price_level,
            } => {
                let mut params = vec![
                    ("location", location.to_query_value()),
                    ("radius", format!("{:.0}", radius_meters.max(MIN_RADIUS_METERS))),
                    ("type", PLACE_TYPE.to_string()),
                ];
                if let Some(keyword) = keyword {
                    params.push(("keyword", keyword.clone()));
                }
                // Equal bounds pin the search to exactly one level.
                if let Some(level) = price_level {
                    params.push(("minprice", level.to_string()));
                    params.push(("maxprice", level.to_string()));
                }
                params
            }
            NearbyQuery::NextPage(token) => vec![("pagetoken", token.clone())],
        };
        params.push((API_KEY_PARAM, api_key.get().to_string()));
        params
    }
}

/// Fetch one page. `ZERO_RESULTS` is an empty page, any other non-OK status
/// is an error.
pub async fn get_page(
    client: &reqwest::Client,
    api_key: &ApiKey,
    endpoint: Option<&str>,
    query: &NearbyQuery,
) -> Result<Response, GetError> {
    let params = query.to_params(api_key);
    let response: Response = util::get_json(
        client,
        endpoint.unwrap_or(DEFAULT_NEARBY_SEARCH_URL),
        &params,
    )
    .await?;
    if response.status == STATUS_ZERO_RESULTS {
        return Ok(Response {
            results: Vec::new(),
            next_page_token: None,
            ..response
        });
    }
    util::check_status(&response.status, response.error_message.as_deref())?;
    Ok(response)
}
