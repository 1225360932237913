//! Open-now lookups through the place-details service.

use tracing::{debug, warn};

use crate::{
    api_interfaces::details::Response,
    constants::{API_KEY_PARAM, DEFAULT_PLACE_DETAILS_URL},
    error::GetError,
    util, ApiKey,
};

const OPENING_HOURS_FIELDS: &str = "opening_hours";

/// Fetch the open-now flag for `place_id`. `Ok(None)` when the place has no
/// opening hours or the flag is missing.
pub async fn get(
    client: &reqwest::Client,
    api_key: &ApiKey,
    endpoint: Option<&str>,
    place_id: &str,
) -> Result<Option<bool>, GetError> {
    let query = [
        ("place_id", place_id.to_string()),
        ("fields", OPENING_HOURS_FIELDS.to_string()),
        (API_KEY_PARAM, api_key.get().to_string()),
    ];
    let response: Response =
        util::get_json(client, endpoint.unwrap_or(DEFAULT_PLACE_DETAILS_URL), &query).await?;
    util::check_status(&response.status, None)?;
    Ok(response
        .result
        .and_then(|details| details.opening_hours)
        .and_then(|hours| hours.open_now))
}

/// Collapse a lookup into a yes/no, treating anything undetermined as open.
pub fn fail_open(place_id: &str, lookup: Result<Option<bool>, GetError>) -> bool {
    match lookup {
        Ok(Some(open)) => open,
        Ok(None) => {
            debug!(place_id, "no open-now flag, assuming open");
            true
        }
        Err(e) => {
            warn!(place_id, error = %e, "open-now check failed, assuming open");
            true
        }
    }
}
