use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{api_interfaces::nearby::PlaceCandidate, geo::Coordinate, price, util};

pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";
const UNRATED: &str = "unrated";

/// Categories shown per restaurant in the digest.
const DIGEST_CATEGORIES: usize = 3;

/// Star rating, or the `"unrated"` sentinel when the place has none.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rating {
    Stars(f64),
    Unrated,
}

impl Rating {
    pub fn stars(&self) -> Option<f64> {
        match self {
            Rating::Stars(stars) => Some(*stars),
            Rating::Unrated => None,
        }
    }
}

impl From<Option<f64>> for Rating {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Rating::Unrated, Rating::Stars)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Stars(stars) => serializer.serialize_f64(*stars),
            Rating::Unrated => serializer.serialize_str(UNRATED),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Stars(f64),
            Label(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Stars(stars) => Rating::Stars(stars),
            Raw::Label(_) => Rating::Unrated,
        })
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Stars(stars) => write!(f, "{stars}/5.0"),
            Rating::Unrated => f.write_str(UNRATED),
        }
    }
}

/// An open restaurant, enriched with its distance from the search origin.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RestaurantResult {
    pub id: String,
    pub name: String,
    pub address: String,
    pub distance_miles: f64,
    pub rating: Rating,
    pub review_count: u32,
    pub price_level_numeric: Option<u8>,
    pub price_level: String,
    pub categories: Vec<String>,
}

impl RestaurantResult {
    pub fn from_candidate(candidate: PlaceCandidate, origin: &Coordinate) -> Self {
        let location = Coordinate::from(candidate.geometry.location);
        Self {
            id: candidate.place_id,
            name: candidate.name,
            address: candidate
                .vicinity
                .unwrap_or_else(|| ADDRESS_NOT_AVAILABLE.to_string()),
            distance_miles: util::round_to_hundredths(origin.distance_miles(&location)),
            rating: candidate.rating.into(),
            review_count: candidate.user_ratings_total.unwrap_or(0),
            price_level_numeric: candidate.price_level,
            price_level: price::display(candidate.price_level),
            categories: candidate.types,
        }
    }
}

impl fmt::Display for RestaurantResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "   Address: {}", self.address)?;
        writeln!(f, "   Distance: {} miles", self.distance_miles)?;
        writeln!(f, "   Rating: {} ({} reviews)", self.rating, self.review_count)?;
        writeln!(f, "   Price: {}", self.price_level)?;
        let categories: Vec<&str> = self
            .categories
            .iter()
            .take(DIGEST_CATEGORIES)
            .map(String::as_str)
            .collect();
        write!(f, "   Categories: {}", categories.join(", "))
    }
}
