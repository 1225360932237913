use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api_interfaces::nearby,
    config::AppConfig,
    error::GetError,
    geo::Coordinate,
    geocode,
    local_time::{self, LocalTime},
    nearby::NearbyQuery,
    open_now,
    restaurant::RestaurantResult,
    search::{self, SearchOptions, SearchOutcome, SearchRequest},
    util, ApiKey,
};

#[derive(Clone, Debug)]
pub struct Client {
    http_client: reqwest::Client,
    endpoints: EndpointConfig,
    api_key: ApiKey,
    search_options: SearchOptions,
}

/// Overrides for the service URLs. Unset entries use the public endpoints.
#[derive(Clone, Debug, Default)]
pub struct EndpointConfig {
    pub geocode: Option<String>,
    pub nearby_search: Option<String>,
    pub place_details: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Error)]
pub enum EndpointConfigError {
    #[error("invalid url for endpoint {0} (url: {1}): {2}")]
    InvalidUrl(String, String, String),
    #[error("unsupported scheme `{1}` for endpoint {0}")]
    UnsupportedScheme(String, String),
}

impl EndpointConfig {
    /// Point every service at `base_url`, using the public path layout.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            geocode: Some(format!("{base}/geocode/json")),
            nearby_search: Some(format!("{base}/place/nearbysearch/json")),
            place_details: Some(format!("{base}/place/details/json")),
            time_zone: Some(format!("{base}/timezone/json")),
        }
    }

    pub fn validate(&self) -> Result<(), EndpointConfigError> {
        let endpoints = [
            ("geocode", &self.geocode),
            ("nearby_search", &self.nearby_search),
            ("place_details", &self.place_details),
            ("time_zone", &self.time_zone),
        ];
        for (name, url) in endpoints {
            let Some(url) = url else {
                continue;
            };
            let parsed = Url::parse(url).map_err(|e| {
                EndpointConfigError::InvalidUrl(name.to_string(), url.clone(), e.to_string())
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(EndpointConfigError::UnsupportedScheme(
                    name.to_string(),
                    parsed.scheme().to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid endpoint configuration: {0}")]
    InvalidEndpointConfig(#[from] EndpointConfigError),
    #[error("no places API key configured")]
    MissingApiKey,
    #[error("unable to build the HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl Client {
    pub fn new(
        http_client: reqwest::Client,
        endpoints: Option<EndpointConfig>,
        api_key: ApiKey,
    ) -> Result<Self, ClientInitError> {
        let endpoints = endpoints.unwrap_or_default();
        endpoints.validate()?;
        Ok(Self {
            http_client,
            endpoints,
            api_key,
            search_options: SearchOptions::default(),
        })
    }

    /// Build a client from loaded configuration. Fails when no API key is set.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientInitError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ClientInitError::MissingApiKey)?;
        let http_client = util::http_client(config.request_timeout)?;
        Ok(Self::new(http_client, None, api_key)?.with_search_options(SearchOptions {
            page_delay: config.page_delay,
            ..SearchOptions::default()
        }))
    }

    pub fn with_search_options(mut self, search_options: SearchOptions) -> Self {
        self.search_options = search_options;
        self
    }

    pub fn search_options(&self) -> &SearchOptions {
        &self.search_options
    }

    pub async fn geocode(&self, postal_code: &str) -> Result<Coordinate, GetError> {
        geocode::get(
            &self.http_client,
            &self.api_key,
            self.endpoints.geocode.as_deref(),
            postal_code,
        )
        .await
    }

    /// Geocode a postal code, logging and discarding any failure.
    pub async fn resolve_postal_code(&self, postal_code: &str) -> Option<Coordinate> {
        match self.geocode(postal_code).await {
            Ok(coordinate) => {
                debug!(postal_code, %coordinate, "resolved postal code");
                Some(coordinate)
            }
            Err(e) => {
                warn!(postal_code, error = %e, "could not convert postal code to coordinates");
                None
            }
        }
    }

    pub async fn open_now(&self, place_id: &str) -> Result<Option<bool>, GetError> {
        open_now::get(
            &self.http_client,
            &self.api_key,
            self.endpoints.place_details.as_deref(),
            place_id,
        )
        .await
    }

    /// Whether a place is open right now. Unknown counts as open.
    pub async fn is_open(&self, place_id: &str) -> bool {
        open_now::fail_open(place_id, self.open_now(place_id).await)
    }

    /// Local time at `location`, or UTC when the time-zone lookup fails.
    pub async fn local_time(&self, location: &Coordinate) -> LocalTime {
        match local_time::get(
            &self.http_client,
            &self.api_key,
            self.endpoints.time_zone.as_deref(),
            location,
        )
        .await
        {
            Ok(local_time) => local_time,
            Err(e) => {
                debug!(error = %e, "time-zone lookup failed, using UTC");
                LocalTime::utc_now()
            }
        }
    }

    pub async fn nearby_page(&self, query: &NearbyQuery) -> Result<nearby::Response, GetError> {
        crate::nearby::get_page(
            &self.http_client,
            &self.api_key,
            self.endpoints.nearby_search.as_deref(),
            query,
        )
        .await
    }

    /// Page through nearby results around `origin`, keeping open restaurants.
    /// Errors only when the first page cannot be fetched.
    pub async fn search(
        &self,
        request: &SearchRequest,
        origin: Coordinate,
    ) -> Result<Vec<RestaurantResult>, GetError> {
        search::run(self, request, origin).await
    }

    /// Geocode, look up local time, then search. Stages run strictly in order.
    pub async fn find_open_restaurants(&self, request: &SearchRequest) -> SearchOutcome {
        let Some(origin) = self.resolve_postal_code(request.postal_code()).await else {
            return SearchOutcome::unresolved();
        };
        let local_time = self.local_time(&origin).await;
        info!(
            postal_code = request.postal_code(),
            local_time = %local_time,
            "searching for open restaurants"
        );
        let (restaurants, search_failed) = match self.search(request, origin).await {
            Ok(restaurants) => {
                info!(count = restaurants.len(), "search finished");
                (restaurants, false)
            }
            Err(e) => {
                warn!(error = %e, "nearby search failed on the first page");
                (Vec::new(), true)
            }
        };
        SearchOutcome {
            origin: Some(origin),
            local_time: Some(local_time),
            restaurants,
            search_failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EndpointConfig::default().validate().is_ok());
    }

    #[test]
    fn base_url_config_is_valid() {
        let endpoints = EndpointConfig::with_base_url("http://127.0.0.1:5000/");

        assert!(endpoints.validate().is_ok());
        assert_eq!(
            endpoints.geocode.as_deref(),
            Some("http://127.0.0.1:5000/geocode/json")
        );
        assert_eq!(
            endpoints.place_details.as_deref(),
            Some("http://127.0.0.1:5000/place/details/json")
        );
    }

    #[test]
    fn rejects_unparseable_url() {
        let endpoints = EndpointConfig {
            geocode: Some("not a url".to_string()),
            ..EndpointConfig::default()
        };

        assert!(matches!(
            endpoints.validate(),
            Err(EndpointConfigError::InvalidUrl(name, _, _)) if name == "geocode"
        ));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let endpoints = EndpointConfig {
            time_zone: Some("ftp://example.com/timezone".to_string()),
            ..EndpointConfig::default()
        };

        assert!(matches!(
            endpoints.validate(),
            Err(EndpointConfigError::UnsupportedScheme(name, scheme))
                if name == "time_zone" && scheme == "ftp"
        ));
    }

    #[test]
    fn new_rejects_invalid_endpoints() {
        let endpoints = EndpointConfig {
            nearby_search: Some("::".to_string()),
            ..EndpointConfig::default()
        };

        let client = Client::new(
            reqwest::Client::new(),
            Some(endpoints),
            ApiKey::from_raw("fake-api-key").unwrap(),
        );

        assert!(matches!(
            client,
            Err(ClientInitError::InvalidEndpointConfig(_))
        ));
    }
}
