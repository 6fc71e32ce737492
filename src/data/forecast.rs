//! Raw locationforecast response model
//!
//! Mirrors the `compact` product of the MET Norway locationforecast 2.0 API.
//! Every field is optional so that a partially populated document still
//! parses; missing readings are handled when the response is shaped into a
//! [`WeatherResult`](super::WeatherResult).

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Top-level GeoJSON feature returned by the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecastResponse {
    /// GeoJSON type, always "Feature"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Point the forecast was computed for
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Forecast metadata and timeseries
    #[serde(default)]
    pub properties: Option<Properties>,
}

/// GeoJSON point geometry: `[longitude, latitude, altitude]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Forecast properties
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub meta: Option<Meta>,
    /// Time-ordered forecast steps, most current first
    #[serde(default)]
    pub timeseries: Vec<TimeStep>,
}

/// Forecast metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    /// When the model run behind this forecast was published
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub units: Option<Units>,
}

/// Unit labels for each reading in [`InstantDetails`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Units {
    pub air_pressure_at_sea_level: Option<String>,
    pub air_temperature: Option<String>,
    pub cloud_area_fraction: Option<String>,
    pub precipitation_amount: Option<String>,
    pub relative_humidity: Option<String>,
    pub wind_from_direction: Option<String>,
    pub wind_speed: Option<String>,
}

/// A single forecast step
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeStep {
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: Option<StepData>,
}

/// Readings for a forecast step
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepData {
    #[serde(default)]
    pub instant: Option<Instant>,
    #[serde(default)]
    pub next_1_hours: Option<PeriodForecast>,
    #[serde(default)]
    pub next_6_hours: Option<PeriodForecast>,
    #[serde(default)]
    pub next_12_hours: Option<PeriodForecast>,
}

impl StepData {
    /// Point-in-time details, if the step carries them
    pub fn details(&self) -> Option<&InstantDetails> {
        self.instant.as_ref()?.details.as_ref()
    }

    /// Weather symbol for the coming hour
    pub fn next_hour_symbol(&self) -> Option<&str> {
        self.next_1_hours.as_ref()?.symbol_code()
    }
}

/// Wrapper around the point-in-time details block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Instant {
    #[serde(default)]
    pub details: Option<InstantDetails>,
}

/// Point-in-time atmospheric readings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstantDetails {
    /// Air pressure at sea level in hPa
    pub air_pressure_at_sea_level: Option<f64>,
    /// Air temperature in Celsius
    pub air_temperature: Option<f64>,
    /// Cloud cover in percent
    pub cloud_area_fraction: Option<f64>,
    /// Relative humidity in percent
    pub relative_humidity: Option<f64>,
    /// Direction the wind blows from, in degrees
    pub wind_from_direction: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
}

/// Summary for the next 1, 6 or 12 hours
///
/// The 12-hour block never carries precipitation details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodForecast {
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default)]
    pub details: Option<PeriodDetails>,
}

impl PeriodForecast {
    pub fn symbol_code(&self) -> Option<&str> {
        self.summary.as_ref()?.symbol_code.as_deref()
    }
}

/// Weather symbol summary, e.g. `"clearsky_day"` or `"lightsnow"`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    pub symbol_code: Option<String>,
}

/// Precipitation for a period
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodDetails {
    /// Precipitation in mm
    pub precipitation_amount: Option<f64>,
}

impl RawForecastResponse {
    /// Data block of the most current forecast step
    pub fn current(&self) -> Option<&StepData> {
        self.properties.as_ref()?.timeseries.first()?.data.as_ref()
    }
}
