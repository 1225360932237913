use std::time::Duration;

/// The default endpoint for the geocoding service
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// The default endpoint for the nearby-search service
pub const DEFAULT_NEARBY_SEARCH_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// The default endpoint for the place-details service
pub const DEFAULT_PLACE_DETAILS_URL: &str =
    "https://maps.googleapis.com/maps/api/place/details/json";

/// The default endpoint for the time-zone service
pub const DEFAULT_TIME_ZONE_URL: &str = "https://maps.googleapis.com/maps/api/timezone/json";

/// The query parameter used to send API keys in requests
pub const API_KEY_PARAM: &str = "key";

/// Environment variable holding the places API key
pub const API_KEY_ENV_VAR: &str = "GOOGLE_PLACES_API_KEY";

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;
pub const METERS_PER_MILE: f64 = 1609.34;

/// Upper bound on nearby-search pages fetched per search (20 results per page).
pub const MAX_PAGES: usize = 3;

/// The places API rejects a continuation token used sooner than this.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the result snapshot is written when no path is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "results.json";

/// Number of restaurants shown in the progress digest.
pub const DIGEST_SIZE: usize = 5;
