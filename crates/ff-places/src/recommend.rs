//! The consumer-facing exchange: criteria in, an ordered list of restaurants
//! out, with a static catalog standing in when the live pipeline is missing.

use std::{fmt, str::FromStr, sync::LazyLock};

use rand::{seq::IndexedRandom, Rng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    client::{Client, ClientInitError},
    config::AppConfig,
    price::{self, PriceLevel},
    restaurant::{Rating, RestaurantResult},
    search::{SearchRequest, SearchRequestBuilderError},
};

/// Restaurants rated at least this are preferred when picking.
pub const GOOD_RATING: f64 = 4.0;

static POSTAL_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("Invalid regex pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    /// Cuisine categories offered for this meal.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            MealType::Breakfast => &["Pancakes", "Eggs", "Bagels", "Coffee Shop", "Diner"],
            MealType::Lunch => &["Sandwiches", "Salads", "Fast Food", "Tacos", "Pizza"],
            MealType::Dinner => &[
                "Italian", "Mexican", "Chinese", "American", "Thai", "Indian", "Japanese",
            ],
        }
    }
}

impl FromStr for MealType {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            _ => Err(CriteriaError::UnknownMealType(s.to_string())),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CriteriaError {
    #[error("unknown meal type `{0}`, expected breakfast, lunch or dinner")]
    UnknownMealType(String),
    #[error("`{category}` is not a {meal_type} category")]
    UnknownCategory {
        meal_type: MealType,
        category: String,
    },
    #[error("`{0}` is not a 5-digit zip code")]
    InvalidPostalCode(String),
    #[error("price level {0} is outside 1-4")]
    InvalidPriceLevel(u8),
    #[error("search radius must be a positive number of miles, got {0}")]
    InvalidRadius(f64),
}

/// What the user picked.
#[derive(Clone, Debug, PartialEq)]
pub struct Criteria {
    meal_type: MealType,
    category: &'static str,
    postal_code: String,
    price_level: Option<PriceLevel>,
    search_radius: f64,
}

impl Criteria {
    /// `price_level` is on the 1-4 display scale.
    pub fn new(
        meal_type: MealType,
        category: &str,
        postal_code: &str,
        price_level: Option<u8>,
        search_radius: f64,
    ) -> Result<Self, CriteriaError> {
        let category = meal_type
            .categories()
            .iter()
            .find(|known| known.eq_ignore_ascii_case(category.trim()))
            .copied()
            .ok_or_else(|| CriteriaError::UnknownCategory {
                meal_type,
                category: category.to_string(),
            })?;
        let postal_code = postal_code.trim();
        if !POSTAL_CODE_REGEX.is_match(postal_code) {
            return Err(CriteriaError::InvalidPostalCode(postal_code.to_string()));
        }
        let price_level = price_level
            .map(|level| {
                PriceLevel::from_ui(level).map_err(|_| CriteriaError::InvalidPriceLevel(level))
            })
            .transpose()?;
        if !search_radius.is_finite() || search_radius <= 0.0 {
            return Err(CriteriaError::InvalidRadius(search_radius));
        }
        Ok(Self {
            meal_type,
            category,
            postal_code: postal_code.to_string(),
            price_level,
            search_radius,
        })
    }

    pub fn meal_type(&self) -> MealType {
        self.meal_type
    }

    pub fn category(&self) -> &str {
        self.category
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Price level on the upstream 0-4 scale.
    pub fn price_level(&self) -> Option<PriceLevel> {
        self.price_level
    }

    pub fn search_radius(&self) -> f64 {
        self.search_radius
    }

    /// The pipeline request: the category becomes the search keyword.
    pub fn to_search_request(&self) -> Result<SearchRequest, SearchRequestBuilderError> {
        SearchRequest::builder()
            .postal_code(self.postal_code.clone())
            .radius_miles(self.search_radius)
            .search_term(Some(self.category.to_lowercase()))
            .price_level(self.price_level)
            .build()
    }
}

/// A restaurant as handed to the consumer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub address: String,
    pub price_range: String,
    pub price_level_numeric: Option<u8>,
    pub rating: Rating,
    pub distance: f64,
    pub is_open: bool,
}

impl From<RestaurantResult> for Recommendation {
    fn from(result: RestaurantResult) -> Self {
        Self {
            id: result.id,
            name: result.name,
            address: result.address,
            price_range: result.price_level,
            price_level_numeric: result.price_level_numeric,
            rating: result.rating,
            distance: result.distance_miles,
            // the pipeline only keeps open places
            is_open: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Live,
    Fallback,
}

#[derive(Clone, Debug, Serialize)]
pub struct Recommendations {
    pub source: Source,
    pub restaurants: Vec<Recommendation>,
}

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    meal_types: &'static [MealType],
    /// 1-4 display scale.
    price_level: u8,
    street: &'static str,
    distance: f64,
    rating: f64,
}

const B: MealType = MealType::Breakfast;
const L: MealType = MealType::Lunch;
const D: MealType = MealType::Dinner;

#[rustfmt::skip]
static CATALOG: [CatalogEntry; 18] = [
    CatalogEntry { id: "catalog-1", name: "Joe's Diner", category: "Diner", meal_types: &[B, L], price_level: 2, street: "123 Main St", distance: 1.5, rating: 4.2 },
    CatalogEntry { id: "catalog-2", name: "Pancake Palace", category: "Pancakes", meal_types: &[B], price_level: 2, street: "456 Maple Ave", distance: 2.3, rating: 4.5 },
    CatalogEntry { id: "catalog-3", name: "Taco Town", category: "Tacos", meal_types: &[L, D], price_level: 1, street: "789 Oak St", distance: 0.8, rating: 4.7 },
    CatalogEntry { id: "catalog-4", name: "Pizza Planet", category: "Pizza", meal_types: &[L, D], price_level: 2, street: "101 Pine Rd", distance: 3.1, rating: 4.0 },
    CatalogEntry { id: "catalog-5", name: "Thai Delight", category: "Thai", meal_types: &[D], price_level: 3, street: "202 Cedar Blvd", distance: 4.2, rating: 4.8 },
    CatalogEntry { id: "catalog-6", name: "Morning Eggs", category: "Eggs", meal_types: &[B], price_level: 1, street: "303 Breakfast Ave", distance: 1.2, rating: 4.3 },
    CatalogEntry { id: "catalog-7", name: "Bagel Bros", category: "Bagels", meal_types: &[B], price_level: 1, street: "404 Morning St", distance: 0.9, rating: 4.1 },
    CatalogEntry { id: "catalog-8", name: "Coffee Corner", category: "Coffee Shop", meal_types: &[B], price_level: 1, street: "505 Bean Blvd", distance: 1.7, rating: 4.4 },
    CatalogEntry { id: "catalog-9", name: "Sandwich Spot", category: "Sandwiches", meal_types: &[L], price_level: 2, street: "606 Lunch Lane", distance: 2.1, rating: 4.0 },
    CatalogEntry { id: "catalog-10", name: "Salad Station", category: "Salads", meal_types: &[L], price_level: 2, street: "707 Healthy Rd", distance: 1.8, rating: 4.2 },
    CatalogEntry { id: "catalog-11", name: "Burger Barn", category: "Fast Food", meal_types: &[L, D], price_level: 1, street: "808 Quick St", distance: 1.3, rating: 3.9 },
    CatalogEntry { id: "catalog-12", name: "Pasta Place", category: "Italian", meal_types: &[D], price_level: 3, street: "909 Italy Ave", distance: 3.4, rating: 4.6 },
    CatalogEntry { id: "catalog-13", name: "Taqueria Delicious", category: "Mexican", meal_types: &[D], price_level: 2, street: "1010 Mexico Blvd", distance: 2.9, rating: 4.3 },
    CatalogEntry { id: "catalog-14", name: "Wok & Roll", category: "Chinese", meal_types: &[D], price_level: 2, street: "1111 China St", distance: 3.7, rating: 4.4 },
    CatalogEntry { id: "catalog-15", name: "All-American Grill", category: "American", meal_types: &[L, D], price_level: 3, street: "1212 USA Ave", distance: 2.4, rating: 4.1 },
    CatalogEntry { id: "catalog-16", name: "Sushi Supreme", category: "Japanese", meal_types: &[D], price_level: 3, street: "1313 Japan Blvd", distance: 4.1, rating: 4.7 },
    CatalogEntry { id: "catalog-17", name: "Curry Kitchen", category: "Indian", meal_types: &[D], price_level: 2, street: "1414 India St", distance: 3.8, rating: 4.5 },
    CatalogEntry { id: "catalog-18", name: "Luxury Dining", category: "American", meal_types: &[D], price_level: 4, street: "1515 Expensive Ave", distance: 5.2, rating: 4.9 },
];

impl CatalogEntry {
    fn matches(&self, criteria: &Criteria) -> bool {
        self.meal_types.contains(&criteria.meal_type)
            && self.category == criteria.category
            && criteria
                .price_level
                .map_or(true, |level| level.get() + 1 == self.price_level)
    }

    fn to_recommendation(&self, postal_code: &str) -> Recommendation {
        let level = self.price_level - 1;
        Recommendation {
            id: self.id.to_string(),
            name: self.name.to_string(),
            address: format!("{}, {postal_code}", self.street),
            price_range: price::display(Some(level)),
            price_level_numeric: Some(level),
            rating: Rating::Stars(self.rating),
            distance: self.distance,
            is_open: true,
        }
    }
}

/// The static catalog filtered by meal, category and price, nearest first.
pub fn fallback(criteria: &Criteria) -> Vec<Recommendation> {
    let mut restaurants: Vec<Recommendation> = CATALOG
        .iter()
        .filter(|entry| entry.matches(criteria))
        .map(|entry| entry.to_recommendation(&criteria.postal_code))
        .collect();
    restaurants.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    restaurants
}

pub struct Recommender {
    client: Option<Client>,
}

impl Recommender {
    /// Without a client every request is answered from the catalog.
    pub fn new(client: Option<Client>) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        match Client::from_config(config) {
            Ok(client) => Self::new(Some(client)),
            Err(ClientInitError::MissingApiKey) => {
                warn!("no places API key configured, using the fallback catalog");
                Self::new(None)
            }
            Err(e) => {
                warn!(error = %e, "places client unavailable, using the fallback catalog");
                Self::new(None)
            }
        }
    }

    pub async fn recommend(&self, criteria: &Criteria) -> Recommendations {
        let Some(client) = &self.client else {
            return Self::from_catalog(criteria);
        };
        let request = match criteria.to_search_request() {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "could not build search request");
                return Self::from_catalog(criteria);
            }
        };
        let outcome = client.find_open_restaurants(&request).await;
        if !outcome.is_complete() {
            return Self::from_catalog(criteria);
        }
        Recommendations {
            source: Source::Live,
            restaurants: outcome
                .restaurants
                .into_iter()
                .map(Recommendation::from)
                .collect(),
        }
    }

    fn from_catalog(criteria: &Criteria) -> Recommendations {
        info!(
            meal_type = %criteria.meal_type,
            category = criteria.category,
            "using fallback catalog"
        );
        Recommendations {
            source: Source::Fallback,
            restaurants: fallback(criteria),
        }
    }
}

/// Pick one restaurant at random, preferring well-rated ones.
pub fn pick<'a, R: Rng + ?Sized>(
    restaurants: &'a [Recommendation],
    rng: &mut R,
) -> Option<&'a Recommendation> {
    let well_rated: Vec<&Recommendation> = restaurants
        .iter()
        .filter(|r| r.rating.stars().is_some_and(|stars| stars >= GOOD_RATING))
        .collect();
    if well_rated.is_empty() {
        return restaurants.choose(rng);
    }
    well_rated.choose(rng).copied()
}

/// Pick a different restaurant than `current_id`. With nothing else to offer,
/// the first restaurant is returned.
pub fn pick_another<'a, R: Rng + ?Sized>(
    restaurants: &'a [Recommendation],
    current_id: &str,
    rng: &mut R,
) -> Option<&'a Recommendation> {
    let others: Vec<&Recommendation> = restaurants
        .iter()
        .filter(|r| r.id != current_id)
        .collect();
    match others.choose(rng) {
        Some(other) => Some(*other),
        None => restaurants.first(),
    }
}
