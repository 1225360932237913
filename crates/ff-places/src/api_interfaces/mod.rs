pub mod details;
pub mod geocode;
pub mod nearby;
pub mod time_zone;

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair as the places API spells it.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Geometry {
    pub location: LatLng,
}
