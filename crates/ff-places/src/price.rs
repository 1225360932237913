//! Price levels on the upstream 0-4 scale and their `$` rendering.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when a place carries no price level.
pub const PRICE_NOT_AVAILABLE: &str = "not available";

const SYMBOL: char = '$';
const MAX_SYMBOLS: usize = 5;

/// Upstream price level, `0` (cheapest) through `4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PriceLevel(u8);

#[derive(Debug, Error, PartialEq)]
pub enum PriceLevelError {
    #[error("price level {0} is outside 0-4")]
    OutOfRange(i64),
    #[error("{0} price symbols given, at most 5 are allowed")]
    TooManySymbols(usize),
    #[error("`{0}` is neither an integer nor a run of `$`")]
    Unparseable(String),
}

impl PriceLevel {
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> Result<Self, PriceLevelError> {
        if level > Self::MAX {
            return Err(PriceLevelError::OutOfRange(level.into()));
        }
        Ok(Self(level))
    }

    /// From the 1-4 scale used by the consumer boundary.
    pub fn from_ui(level: u8) -> Result<Self, PriceLevelError> {
        match level {
            1..=4 => Ok(Self(level - 1)),
            _ => Err(PriceLevelError::OutOfRange(level.into())),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn symbols(self) -> String {
        display(Some(self.0))
    }
}

/// Render a raw upstream level: 0-3 become 1-4 symbols, anything higher
/// is capped at four, absent is [`PRICE_NOT_AVAILABLE`].
pub fn display(level: Option<u8>) -> String {
    match level {
        Some(level) => SYMBOL
            .to_string()
            .repeat(usize::from(level.min(3)) + 1),
        None => PRICE_NOT_AVAILABLE.to_string(),
    }
}

impl FromStr for PriceLevel {
    type Err = PriceLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.chars().all(|c| c == SYMBOL) {
            let count = s.chars().count();
            if count > MAX_SYMBOLS {
                return Err(PriceLevelError::TooManySymbols(count));
            }
            // 1..=5 symbols, so this always fits
            return Self::new((count - 1) as u8);
        }
        let level: i64 = s
            .parse()
            .map_err(|_| PriceLevelError::Unparseable(s.to_string()))?;
        match u8::try_from(level) {
            Ok(level) => Self::new(level),
            Err(_) => Err(PriceLevelError::OutOfRange(level)),
        }
    }
}

impl TryFrom<u8> for PriceLevel {
    type Error = PriceLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceLevel> for u8 {
    fn from(value: PriceLevel) -> Self {
        value.0
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
