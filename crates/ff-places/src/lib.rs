pub mod api_interfaces;
mod api_key;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod local_time;
pub mod nearby;
pub mod open_now;
pub mod price;
pub mod recommend;
pub mod restaurant;
pub mod search;
pub mod snapshot;
mod util;

pub use api_interfaces::nearby::PlaceCandidate;
pub use api_key::ApiKey;
pub use client::Client;
pub use geo::Coordinate;
pub use price::PriceLevel;
pub use restaurant::{Rating, RestaurantResult};
pub use search::{SearchRequest, SearchRequestBuilder, SearchRequestBuilderError};
pub use snapshot::ResultSnapshot;
