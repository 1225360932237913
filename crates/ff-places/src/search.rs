//! The paged search: fetch a page, check each candidate, keep the open ones.
//!
//! All I/O goes through [`Client`]; deciding whether to fetch another page and
//! turning a checked page into results are plain functions.

use std::time::Duration;

use derive_builder::Builder;
use tracing::{debug, warn};

use crate::{
    api_interfaces::nearby::PlaceCandidate,
    client::Client,
    constants::{DEFAULT_PAGE_DELAY, MAX_PAGES},
    error::GetError,
    geo::Coordinate,
    local_time::LocalTime,
    nearby::NearbyQuery,
    price::PriceLevel,
    restaurant::RestaurantResult,
};

/// What to search for. Built once from user input and never changed.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SearchRequest {
    postal_code: String,
    radius_miles: f64,
    #[builder(default)]
    search_term: Option<String>,
    #[builder(default)]
    price_level: Option<PriceLevel>,
}

impl SearchRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(postal_code) = &self.postal_code {
            if postal_code.trim().is_empty() {
                return Err("postal code must not be empty".to_string());
            }
        }
        if let Some(radius) = self.radius_miles {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(format!("radius must be a positive number of miles, got {radius}"));
            }
        }
        Ok(())
    }
}

impl SearchRequest {
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::default()
    }

    pub fn postal_code(&self) -> &str {
        self.postal_code.trim()
    }

    pub fn radius_miles(&self) -> f64 {
        self.radius_miles
    }

    /// The keyword, if one was given and is not blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    pub fn price_level(&self) -> Option<PriceLevel> {
        self.price_level
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOptions {
    pub max_pages: usize,
    /// Wait before spending a continuation token.
    pub page_delay: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_pages: MAX_PAGES,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// Everything one run of the pipeline produced.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// `None` when the postal code could not be geocoded.
    pub origin: Option<Coordinate>,
    pub local_time: Option<LocalTime>,
    pub restaurants: Vec<RestaurantResult>,
    /// The first results page could not be fetched, so nothing was searched.
    pub search_failed: bool,
}

impl SearchOutcome {
    pub fn unresolved() -> Self {
        Self {
            origin: None,
            local_time: None,
            restaurants: Vec::new(),
            search_failed: false,
        }
    }

    /// Whether the pipeline actually ran: the origin resolved and the search
    /// got at least one page back.
    pub fn is_complete(&self) -> bool {
        self.origin.is_some() && !self.search_failed
    }
}

#[derive(Debug, PartialEq)]
pub enum PageStep {
    Continue(String),
    Stop(StopReason),
}

#[derive(Debug, PartialEq)]
pub enum StopReason {
    /// No continuation token.
    Exhausted,
    PageLimit,
}

pub fn next_step(
    next_page_token: Option<String>,
    pages_fetched: usize,
    max_pages: usize,
) -> PageStep {
    if pages_fetched >= max_pages {
        return PageStep::Stop(StopReason::PageLimit);
    }
    match next_page_token {
        Some(token) if !token.is_empty() => PageStep::Continue(token),
        _ => PageStep::Stop(StopReason::Exhausted),
    }
}

/// Turn candidates paired with their open-now status into results, dropping
/// the closed ones.
pub fn reduce_page<I>(origin: &Coordinate, checked: I) -> Vec<RestaurantResult>
where
    I: IntoIterator<Item = (PlaceCandidate, bool)>,
{
    checked
        .into_iter()
        .filter(|(_, open)| *open)
        .map(|(candidate, _)| RestaurantResult::from_candidate(candidate, origin))
        .collect()
}

/// Stable, so equal distances keep the order they were found in.
pub fn sort_by_distance(restaurants: &mut [RestaurantResult]) {
    restaurants.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
}

/// Fails only when the first page does; a later failure keeps what was
/// collected.
pub(crate) async fn run(
    client: &Client,
    request: &SearchRequest,
    origin: Coordinate,
) -> Result<Vec<RestaurantResult>, GetError> {
    let options = client.search_options();
    let mut restaurants = Vec::new();
    let mut query = NearbyQuery::initial(request, origin);
    let mut pages_fetched = 0;

    loop {
        let page = match client.nearby_page(&query).await {
            Ok(page) => page,
            Err(e) if pages_fetched == 0 => return Err(e),
            Err(e) => {
                warn!(
                    page = pages_fetched + 1,
                    error = %e,
                    "nearby search failed, keeping results collected so far"
                );
                break;
            }
        };
        pages_fetched += 1;

        let mut checked = Vec::with_capacity(page.results.len());
        for candidate in page.results {
            let open = client.is_open(&candidate.place_id).await;
            checked.push((candidate, open));
        }
        let candidates = checked.len();
        let open = reduce_page(&origin, checked);
        debug!(page = pages_fetched, candidates, open = open.len(), "processed page");
        restaurants.extend(open);

        match next_step(page.next_page_token, pages_fetched, options.max_pages) {
            PageStep::Continue(token) => {
                tokio::time::sleep(options.page_delay).await;
                query = NearbyQuery::NextPage(token);
            }
            PageStep::Stop(reason) => {
                debug!(?reason, pages_fetched, "pagination finished");
                break;
            }
        }
    }

    sort_by_distance(&mut restaurants);
    Ok(restaurants)
}
