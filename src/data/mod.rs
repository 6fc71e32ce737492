//! Core data models for metcast
//!
//! This module contains the types a caller passes in (coordinates, unit
//! preference) and the shaped weather result handed back and cached.

pub mod forecast;
pub mod units;
pub mod weather;

pub use forecast::RawForecastResponse;
pub use weather::{WeatherClient, WeatherConfig, WeatherError};

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Sentinel text for a reading the forecast did not include
pub const NOT_AVAILABLE: &str = "N/A";

/// A geographic coordinate in decimal degrees
///
/// No range validation is done; the values are passed to the API as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Error parsing a `LAT,LON` coordinate string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinateParseError {
    #[error("Expected LAT,LON but got '{0}'")]
    MissingSeparator(String),

    #[error("Invalid number '{0}' in coordinate")]
    InvalidNumber(String),
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::MissingSeparator(s.to_string()))?;

        let parse = |part: &str| {
            let part = part.trim();
            part.parse::<f64>()
                .map_err(|_| CoordinateParseError::InvalidNumber(part.to_string()))
        };

        Ok(Self::new(parse(lat)?, parse(lon)?))
    }
}

/// Which temperature unit to report as the "local" reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Maps a unit preference string to a unit
    ///
    /// `"imperial"` selects Fahrenheit; any other value selects Celsius.
    pub fn from_preference(preference: &str) -> Self {
        if preference == "imperial" {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        }
    }

    /// Display symbol for the unit
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

/// A whole-number reading, or a marker that the forecast omitted it
///
/// Serializes as a JSON number, or as the string `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reading {
    Value(i64),
    NotAvailable,
}

impl Reading {
    /// The numeric value, if present
    pub fn value(&self) -> Option<i64> {
        match self {
            Reading::Value(v) => Some(*v),
            Reading::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Value(_))
    }
}

impl From<Option<i64>> for Reading {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Reading::NotAvailable, Reading::Value)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => write!(f, "{}", v),
            Reading::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => serializer.serialize_i64(*v),
            Reading::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Wind speed in two units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindSpeed {
    pub kph: Reading,
    pub mph: Reading,
}

/// Temperature in both scales, plus the caller's preferred one when requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Temperature {
    #[serde(rename = "C")]
    pub celsius: Reading,
    #[serde(rename = "F")]
    pub fahrenheit: Reading,
    /// The reading in the requested unit (unit-aware lookups only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<Reading>,
    /// "°C" or "°F" (unit-aware lookups only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<&'static str>,
}

impl Temperature {
    /// Builds the unit-agnostic form with no `local`/`symbol`
    pub fn new(celsius: Reading, fahrenheit: Reading) -> Self {
        Self {
            celsius,
            fahrenheit,
            local: None,
            symbol: None,
        }
    }

    /// Fills `local` and `symbol` for the given unit
    pub fn in_unit(mut self, unit: TemperatureUnit) -> Self {
        self.local = Some(match unit {
            TemperatureUnit::Celsius => self.celsius,
            TemperatureUnit::Fahrenheit => self.fahrenheit,
        });
        self.symbol = Some(unit.symbol());
        self
    }
}

/// Current conditions shaped from the first forecast step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherResult {
    /// Weather symbol for the next hour, e.g. "cloudy"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_code: Option<String>,
    /// Direction the wind blows from, in degrees
    pub wind_from_direction: f64,
    pub wind_speed: WindSpeed,
    pub temperature: Temperature,
}
